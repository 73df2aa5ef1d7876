//! Plain-text rendering of transcripts and tool cards.

use hooper_chat::{Chat, Message, ToolName};
use hooper_espn::{HomeAway, News, Scoreboard};

pub(crate) const fn topic(tool: ToolName) -> &'static str {
    match tool {
        ToolName::GetNews => "news",
        ToolName::GetScores => "scores",
    }
}

pub(crate) fn news(news: &News) {
    for article in &news.articles {
        println!("* {}", article.headline);
        println!("  {}", article.description);
        println!("  {}", article.links.web.href);
    }
    if news.articles.is_empty() {
        println!("No articles right now.");
    }
}

pub(crate) fn scores(scoreboard: &Scoreboard) {
    for event in &scoreboard.events {
        for competition in &event.competitions {
            let away = competition
                .competitors
                .iter()
                .find(|c| c.home_away == HomeAway::Away);
            let home = competition
                .competitors
                .iter()
                .find(|c| c.home_away == HomeAway::Home);

            match (away, home) {
                (Some(away), Some(home)) => println!(
                    "{} {} @ {} {}",
                    away.team.abbreviation, away.score, home.team.abbreviation, home.score,
                ),
                _ => println!("{}", event.name),
            }
        }
    }
    if scoreboard.events.is_empty() {
        println!("No games on that day.");
    }
}

pub(crate) fn chat_summary(chat: &Chat) {
    let shared = chat.share_path.as_deref().unwrap_or("-");
    println!(
        "{}  {}  [{} messages]  shared: {}",
        chat.id,
        chat.title,
        chat.messages.len(),
        shared,
    );
}

pub(crate) fn transcript(chat: &Chat) {
    println!("# {} ({})", chat.title, chat.created_at.format("%Y-%m-%d"));
    for message in &chat.messages {
        print_message(message);
    }
}

fn print_message(message: &Message) {
    if let Some(text) = message.as_user_text() {
        println!("you> {text}");
        return;
    }

    if let Some(text) = message.as_assistant_text() {
        println!("bot> {text}");
        return;
    }

    for call in message.tool_calls() {
        println!("bot> [{} {}]", call.name, call.arguments);
    }

    for result in message.tool_results() {
        match &result.result {
            Ok(_) => println!("tool> [{} result]", result.name),
            Err(marker) => println!("tool> [{} failed: {marker}]", result.name),
        }
    }
}
