pub mod tanabata;
