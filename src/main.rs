// flipquotes command-line entry point.
// Loads quotes through the local cache and prints them as cards.

use std::sync::Arc;

use rand::seq::SliceRandom;
use tracing::info;
use tracing_subscriber::{EnvFilter, prelude::*};

use flipquotes::cache::{FileStorage, QuoteCache, paths};
use flipquotes::feed::FeedClient;
use flipquotes::prefs::{Appearance, FontKey, VisualTheme};
use flipquotes::quotes::{self, MarkKind, MarkSet, Quote};
use flipquotes::{Config, FlipQuotesError, Result};

const USAGE: &str = "usage: flipquotes [refresh | themes | search <query> | bookmark <query> | bookmarks | theme <black|white> | font <quote|author> <key>]";

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    let env_filter = EnvFilter::from_default_env().add_directive(
        "flipquotes=info"
            .parse()
            .map_err(|e| FlipQuotesError::Other(format!("Invalid log directive: {}", e)))?,
    );
    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = Config::from_env()?;
    info!(feed = %config.feed_url, cache = %config.cache_dir.display(), "Starting flipquotes");

    let args: Vec<String> = std::env::args().skip(1).collect();
    let command = args.first().map(String::as_str).unwrap_or("");
    let query = args.get(1..).map(|rest| rest.join(" ")).unwrap_or_default();

    if command == "theme" {
        return set_theme(&config, &query);
    }
    if command == "font" {
        return set_font(&config, args.get(1), args.get(2));
    }

    let client = FeedClient::from_config(&config)?;
    let storage = Arc::new(FileStorage::new(&config.cache_dir));
    let cache = QuoteCache::new(client, storage).with_ttl(config.cache_ttl);

    let all = match command {
        "refresh" => cache.force_refresh().await,
        _ => cache.get_quotes().await,
    };

    if all.is_empty() {
        println!("No quotes available. Check your connection and try `flipquotes refresh`.");
        return Ok(());
    }

    let bookmarks_path = MarkKind::Bookmark.path_in(&config.data_dir);

    match command {
        "" | "refresh" => {
            let appearance = Appearance::load(&paths::appearance_path(&config.data_dir));
            if let Some(quote) = all.choose(&mut rand::thread_rng()) {
                print_card(quote, appearance.theme);
            }
            println!("{} quotes ({:?} cache)", all.len(), cache.state());
        }
        "themes" => {
            for theme in quotes::rank_themes(&all, quotes::DEFAULT_THEME_LIMIT) {
                println!("{}", theme);
            }
        }
        "search" => {
            let matches = quotes::search(&all, &query);
            if matches.is_empty() {
                println!("Try: {}", quotes::suggestions(&query).join(", "));
            }
            for quote in matches {
                println!("\"{}\" - {} [{}]", quote.quote, quote.author, quote.theme);
            }
        }
        "bookmark" => {
            let mut marks = MarkSet::load(&bookmarks_path)?;
            match quotes::search(&all, &query).first() {
                Some(quote) => {
                    let marked = marks.toggle(quote);
                    marks.save(&bookmarks_path)?;
                    let verb = if marked { "Bookmarked" } else { "Removed bookmark" };
                    println!("{}: \"{}\" - {}", verb, quote.quote, quote.author);
                }
                None => println!("No quote matches \"{}\"", query),
            }
        }
        "bookmarks" => {
            let marks = MarkSet::load(&bookmarks_path)?;
            for quote in marks.select(&all) {
                println!("\"{}\" - {}", quote.quote, quote.author);
            }
        }
        _ => println!("{}", USAGE),
    }

    Ok(())
}

fn print_card(quote: &Quote, theme: VisualTheme) {
    let rule = match theme {
        VisualTheme::Black => "=",
        VisualTheme::White => "-",
    }
    .repeat(40);

    println!("{}", rule);
    println!("\"{}\"", quote.quote);
    println!("  - {} [{}]", quote.author, quote.theme);
    if let Some(flipped) = &quote.flipped_quote {
        println!();
        println!("Flipped: {}", flipped);
    }
    println!("{}", rule);
}

fn set_theme(config: &Config, name: &str) -> Result<()> {
    let path = paths::appearance_path(&config.data_dir);
    let appearance = Appearance {
        theme: VisualTheme::from_name(name.trim()),
        ..Appearance::load(&path)
    };
    appearance.save(&path)?;
    println!("Theme set to {}", appearance.theme.name());
    Ok(())
}

fn set_font(config: &Config, target: Option<&String>, key: Option<&String>) -> Result<()> {
    let font = match key.and_then(|key| FontKey::from_key(key)) {
        Some(font) => font,
        None => {
            let keys: Vec<&str> = FontKey::ALL.iter().map(FontKey::key).collect();
            println!("Fonts: {}", keys.join(", "));
            return Ok(());
        }
    };

    let path = paths::appearance_path(&config.data_dir);
    let mut appearance = Appearance::load(&path);
    match target.map(String::as_str) {
        Some("quote") => appearance.quote_font = font,
        Some("author") => appearance.author_font = font,
        _ => {
            println!("{}", USAGE);
            return Ok(());
        }
    }
    appearance.save(&path)?;
    println!("Font set to {}", font.display_name());
    Ok(())
}
