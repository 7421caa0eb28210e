use serenity::all::{CreateEmbed, CreateEmbedAuthor, CreateEmbedFooter};

/// Default color for footer-style embeds (status and error replies).
pub const FOOTER_EMBED_COLOR: u32 = 0x9B_59_B6;

/// Default color for author-style embeds (greetings and previews).
pub const AUTHOR_EMBED_COLOR: u32 = 0x96_C7_31;

/// Build a footer-style embed: icon + text in the footer line.
pub fn footer_embed(icon_url: &str, text: impl Into<String>) -> CreateEmbed {
    footer_embed_with_color(icon_url, text, FOOTER_EMBED_COLOR)
}

pub fn footer_embed_with_color(
    icon_url: &str,
    text: impl Into<String>,
    color: u32,
) -> CreateEmbed {
    CreateEmbed::new()
        .color(color)
        .footer(CreateEmbedFooter::new(text).icon_url(icon_url))
}

/// Build an author-style embed: icon + text in the author line.
pub fn author_embed(icon_url: &str, text: impl Into<String>) -> CreateEmbed {
    author_embed_with_color(icon_url, text, AUTHOR_EMBED_COLOR)
}

pub fn author_embed_with_color(
    icon_url: &str,
    text: impl Into<String>,
    color: u32,
) -> CreateEmbed {
    CreateEmbed::new()
        .color(color)
        .author(CreateEmbedAuthor::new(text).icon_url(icon_url))
}
