use std::{
    io::{BufRead as _, Write as _},
    sync::Arc,
};

use hooper_agent::{Agent, Progress, Reply, Session};
use hooper_chat::{ChatId, ChatState};
use hooper_store::ChatStore;

use crate::{
    config::Config,
    error::{Error, Result},
    render,
};

#[derive(Debug, clap::Parser)]
#[command(name = "hooper", version, about = "Conversational NBA assistant")]
pub(crate) struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, clap::Subcommand)]
enum Commands {
    /// Chat with the assistant.
    Chat(Chat),

    /// List stored chats.
    List,

    /// Print one stored chat.
    Show { id: ChatId },

    /// Print a chat shared by someone else.
    Shared { path: String },

    /// Publish a chat under its share path.
    Share { id: ChatId },

    /// Delete one chat.
    Remove { id: ChatId },

    /// Delete all stored chats.
    Clear,
}

#[derive(Debug, clap::Args)]
struct Chat {
    /// Resume a stored conversation instead of starting a new one.
    #[arg(long)]
    resume: Option<ChatId>,

    /// Chat without an identity; turns are rate limited per address and
    /// nothing is persisted.
    #[arg(long)]
    anonymous: bool,
}

impl Cli {
    pub(crate) async fn run(self, config: &Config) -> Result<()> {
        match self.command {
            Commands::Chat(args) => chat(args, config).await,
            Commands::List => list(config),
            Commands::Show { id } => show(id, config),
            Commands::Shared { path } => shared(&path, config),
            Commands::Share { id } => share(id, config),
            Commands::Remove { id } => remove(id, config),
            Commands::Clear => clear(config),
        }
    }
}

fn store(config: &Config) -> Result<ChatStore> {
    Ok(ChatStore::open(&config.db_path)?)
}

fn espn_client(config: &Config) -> Result<hooper_espn::Client> {
    let client = match &config.espn_base_url {
        Some(url) => hooper_espn::Client::with_base_url(url)?,
        None => hooper_espn::Client::new()?,
    };

    Ok(client)
}

fn owner(config: &Config) -> Result<hooper_chat::UserId> {
    config
        .session()
        .user_id()
        .ok_or(Error::MissingEnv("HOOPER_USER"))
}

async fn chat(args: Chat, config: &Config) -> Result<()> {
    let api_key = config.require_api_key()?;

    let mut client = hooper_llm::Client::new(api_key);
    if let Some(url) = &config.openai_base_url {
        client = client.with_base_url(url.clone());
    }

    let agent = Agent::new(Arc::new(client), espn_client(config)?, store(config)?)
        .with_model(config.model.clone());

    let session = if args.anonymous {
        Session::anonymous(std::net::IpAddr::V4(std::net::Ipv4Addr::LOCALHOST))
    } else {
        config.session()
    };

    let mut state = match args.resume {
        Some(id) => agent.load_chat(id, &session)?,
        None => ChatState::new(),
    };

    let stdin = std::io::stdin();
    let mut stdout = std::io::stdout();

    loop {
        write!(stdout, "you> ")?;
        stdout.flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }

        let text = line.trim();
        if text.is_empty() {
            continue;
        }
        if text == "/quit" {
            break;
        }

        let (next, result) = agent
            .submit_turn(state, text, &session, |progress| match progress {
                Progress::ContentDelta(delta) => {
                    print!("{delta}");
                    let _ = std::io::stdout().flush();
                }
                Progress::ToolPending(tool) => {
                    println!("bot> fetching {}...", render::topic(tool));
                }
            })
            .await;
        state = next;

        match result {
            Ok(Reply::Message(_)) => println!(),
            Ok(Reply::News(news)) => render::news(&news),
            Ok(Reply::Scores(scoreboard)) => render::scores(&scoreboard),
            Err(error) => println!("bot> {error}"),
        }
    }

    Ok(())
}

fn list(config: &Config) -> Result<()> {
    let owner = owner(config)?;
    let store = store(config)?;

    let chats = store.list(owner)?;
    if chats.is_empty() {
        println!("No stored chats.");
        return Ok(());
    }

    for chat in chats {
        render::chat_summary(&chat);
    }

    Ok(())
}

fn show(id: ChatId, config: &Config) -> Result<()> {
    let owner = owner(config)?;
    let store = store(config)?;

    render::transcript(&store.get(id, owner)?);
    Ok(())
}

fn shared(path: &str, config: &Config) -> Result<()> {
    let store = store(config)?;
    render::transcript(&store.get_shared(path)?);
    Ok(())
}

fn share(id: ChatId, config: &Config) -> Result<()> {
    let owner = owner(config)?;
    let store = store(config)?;

    let path = store.share(id, owner)?;
    println!("{path}");
    Ok(())
}

fn remove(id: ChatId, config: &Config) -> Result<()> {
    let owner = owner(config)?;
    let store = store(config)?;

    store.remove(id, owner)?;
    println!("Removed {id}.");
    Ok(())
}

fn clear(config: &Config) -> Result<()> {
    let owner = owner(config)?;
    let store = store(config)?;

    store.clear(owner)?;
    println!("Cleared all chats.");
    Ok(())
}
