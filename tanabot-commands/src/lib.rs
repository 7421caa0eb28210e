pub mod fun;
pub mod utility;

use serenity::all::Context as SerenityContext;

use tanabot_dispatch::Command;

/// The fixed command catalog, in registration order. Extend by adding a
/// descriptor module and listing it here.
pub fn commands() -> Vec<Command<SerenityContext>> {
    vec![utility::help::command(), fun::tanabata::command()]
}
