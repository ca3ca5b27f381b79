use anyhow::Context;
use blog_client::BlogClient;
use blog_client::token::{TOKEN_FILE, clear_token, load_token, save_token};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

#[derive(Parser, Debug)]
#[command(name = "blog", about = "Command-line client for the blog API")]
struct Cli {
    /// Base URL of the server, without the `/api` prefix.
    #[arg(short, long, env = "BLOG_SERVER", default_value = "http://127.0.0.1:8080")]
    server: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    Register {
        #[arg(long)]
        username: String,
        #[arg(long)]
        password: String,
        #[arg(long)]
        email: Option<String>,
    },
    /// Obtains a token and saves it for the following commands.
    Login {
        #[arg(long)]
        username: String,
        #[arg(long)]
        password: String,
    },
    Logout,
    ListPosts {
        #[arg(long)]
        limit: Option<u32>,
        #[arg(long)]
        offset: Option<u32>,
    },
    GetPost {
        id: Uuid,
    },
    CreatePost {
        #[arg(long)]
        title: String,
        #[arg(long)]
        content: String,
    },
    UpdatePost {
        id: Uuid,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        content: Option<String>,
    },
    DeletePost {
        id: Uuid,
    },
    /// Lists the comments of a post, or all comments without `--post`.
    ListComments {
        #[arg(long)]
        post: Option<Uuid>,
    },
    AddComment {
        #[arg(long)]
        post: Uuid,
        #[arg(long)]
        text: String,
    },
    UpdateComment {
        id: Uuid,
        #[arg(long)]
        text: String,
    },
    DeleteComment {
        id: Uuid,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let args = Cli::parse();

    let token = load_token(TOKEN_FILE).context("failed to read saved token")?;
    let mut client = BlogClient::new(&args.server)?.with_token(token);

    match args.command {
        Command::Register {
            username,
            password,
            email,
        } => {
            let user = client
                .register(&username, &password, email.as_deref())
                .await?;
            println!("Registered {} ({})", user.username, user.id);
        }
        Command::Login { username, password } => {
            let auth = client.obtain_token(&username, &password).await?;
            save_token(TOKEN_FILE, &auth.token).context("failed to save token")?;
            println!("Logged in, token valid for {}s", auth.expires_in);
        }
        Command::Logout => {
            clear_token(TOKEN_FILE).context("failed to remove token")?;
            println!("Logged out");
        }
        Command::ListPosts { limit, offset } => {
            let posts = client.list_posts(limit, offset).await?;
            println!("Posts ({})", posts.len());
            for post in posts {
                println!("- [{}] {} (by {})", post.id, post.title, post.author);
            }
        }
        Command::GetPost { id } => {
            let post = client.get_post(id).await?;
            println!("{post}");
        }
        Command::CreatePost { title, content } => {
            let post = client.create_post(&title, &content).await?;
            println!("Post created! ID: {}", post.id);
        }
        Command::UpdatePost { id, title, content } => {
            let post = client
                .update_post(id, title.as_deref(), content.as_deref())
                .await?;
            println!("Post updated: {post}");
        }
        Command::DeletePost { id } => {
            client.delete_post(id).await?;
            println!("Post deleted!");
        }
        Command::ListComments { post } => {
            let comments = client.list_comments(post).await?;
            println!("Comments ({})", comments.len());
            for comment in comments {
                println!("- {comment}");
            }
        }
        Command::AddComment { post, text } => {
            let comment = client.create_comment(post, &text).await?;
            println!("Comment added! ID: {}", comment.id);
        }
        Command::UpdateComment { id, text } => {
            let comment = client.update_comment(id, &text).await?;
            println!("Comment updated: {comment}");
        }
        Command::DeleteComment { id } => {
            client.delete_comment(id).await?;
            println!("Comment deleted!");
        }
    }

    Ok(())
}
