mod recommend;

use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};

use fridgechef_core::models::{
    ProfileUpdate, RateRequest, RecipeType, SignupRequest, UserRecipeUpsert,
};
use fridgechef_core::{
    normalize_recipe, shopping_query, ApiClient, ApiError, Config, DiskTokenStore, Session,
};

#[derive(Parser)]
#[command(name = "fridgechef")]
#[command(about = "냉장고 레시피 CLI", long_about = None)]
struct Cli {
    /// Server URL (default: $FRIDGECHEF_SERVER_URL or http://127.0.0.1:8183/api)
    #[arg(long, global = true)]
    server: Option<String>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create an account
    Signup {
        #[arg(long)]
        email: String,
        #[arg(long)]
        username: String,
        #[arg(long)]
        password: String,
    },
    /// Log in and store the token pair
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Log out and discard stored tokens
    Logout,
    /// Show the profile, or update it when flags are given
    Profile {
        #[arg(long)]
        username: Option<String>,
        #[arg(long)]
        email: Option<String>,
        /// New password (required by the server when updating)
        #[arg(long)]
        password: Option<String>,
    },
    /// Delete the account permanently
    DeleteAccount {
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },
    /// Search recipes by ingredients
    Search {
        /// Comma-separated ingredients, e.g. "감자, 양파"
        ingredients: String,
    },
    /// Show a recipe in full, looked up by title
    Detail {
        title: String,
        /// Also print a shopping search query per ingredient
        #[arg(long)]
        shopping: bool,
    },
    /// Show the ten highest-rated recipes
    Top10,
    /// AI recipe recommendation (interactive unless --ingredients is given)
    Recommend(recommend::RecommendArgs),
    /// Manage favorite recipes
    Favorites {
        #[command(subcommand)]
        command: FavoritesCommand,
    },
    /// Rate a recipe from 0.5 to 5.0
    Rate {
        recipe_id: i64,
        score: f64,
        /// Rate a user-submitted recipe instead of a public one
        #[arg(long)]
        user_recipe: bool,
    },
    /// Manage your ratings
    Ratings {
        #[command(subcommand)]
        command: RatingsCommand,
    },
    /// Community board
    Board {
        #[command(subcommand)]
        command: BoardCommand,
    },
    /// Your own uploaded recipes
    Recipes {
        #[command(subcommand)]
        command: RecipesCommand,
    },
}

#[derive(Subcommand)]
enum FavoritesCommand {
    /// List favorite recipes
    List,
    /// Add a public recipe to favorites
    Add { recipe_id: i64 },
    /// Remove a recipe from favorites
    Remove { recipe_id: i64 },
}

#[derive(Subcommand)]
enum RatingsCommand {
    /// List the ratings you have given
    List,
    /// Change the score of a recipe you already rated
    Update {
        recipe_id: i64,
        score: f64,
        /// The rating targets a user-submitted recipe
        #[arg(long)]
        user_recipe: bool,
    },
    /// Delete one of your ratings
    Delete { rating_id: i64 },
}

#[derive(Subcommand)]
enum BoardCommand {
    /// List board posts
    List {
        /// Only posts written by the logged-in user
        #[arg(long)]
        mine: bool,
    },
    /// Write a new post
    Post {
        #[arg(long)]
        title: String,
        #[arg(long)]
        content: String,
    },
    /// Edit one of your posts
    Edit {
        board_id: i64,
        #[arg(long)]
        title: String,
        #[arg(long)]
        content: String,
    },
    /// Delete one of your posts
    Delete { board_id: i64 },
    /// Show the comments under a post
    Comments { board_id: i64 },
    /// Comment on a post
    Comment {
        board_id: i64,
        content: String,
        /// Reply to an existing comment
        #[arg(long)]
        reply_to: Option<i64>,
    },
    /// Delete one of your comments
    DeleteComment { comment_id: i64 },
}

#[derive(Subcommand)]
enum RecipesCommand {
    /// List your uploaded recipes
    Mine,
    /// Upload a recipe
    Upload {
        #[arg(long)]
        name: String,
        #[arg(long)]
        description: String,
        /// Comma-separated ingredient list
        #[arg(long)]
        ingredients: String,
        #[arg(long)]
        image_url: Option<String>,
        /// Public recipe this one is based on
        #[arg(long, default_value = "")]
        base_recipe: String,
    },
    /// Edit one of your recipes
    Edit {
        user_recipe_id: i64,
        #[arg(long)]
        name: String,
        #[arg(long)]
        description: String,
        #[arg(long)]
        ingredients: String,
        #[arg(long)]
        image_url: Option<String>,
        #[arg(long, default_value = "")]
        base_recipe: String,
    },
    /// Delete one of your recipes
    Delete { user_recipe_id: i64 },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let client = build_client(cli.server.as_deref())?;

    if let Err(e) = run(cli.command, &client).await {
        if matches!(e.downcast_ref::<ApiError>(), Some(ApiError::AuthRequired)) {
            eprintln!("로그인이 필요합니다: fridgechef login --email <이메일> --password <비밀번호>");
            std::process::exit(1);
        }
        return Err(e);
    }
    Ok(())
}

async fn run(command: Commands, client: &ApiClient) -> Result<()> {
    match command {
        Commands::Signup {
            email,
            username,
            password,
        } => {
            client
                .signup(&SignupRequest {
                    email,
                    username,
                    confirm_password: password.clone(),
                    password,
                })
                .await?;
            println!("가입이 완료되었습니다. 로그인해주세요.");
        }
        Commands::Login { email, password } => {
            client.login(&email, &password).await?;
            println!("로그인되었습니다.");
        }
        Commands::Logout => {
            client.logout().await?;
            println!("로그아웃되었습니다.");
        }
        Commands::Profile {
            username,
            email,
            password,
        } => {
            profile(client, username, email, password).await?;
        }
        Commands::DeleteAccount { yes } => {
            if !yes && !confirm("계정을 영구 삭제합니다. 계속할까요? [y/N] ")? {
                println!("취소되었습니다.");
                return Ok(());
            }
            client.delete_account().await?;
            println!("계정이 삭제되었습니다.");
        }
        Commands::Search { ingredients } => {
            search(client, &ingredients).await?;
        }
        Commands::Detail { title, shopping } => {
            detail(client, &title, shopping).await?;
        }
        Commands::Top10 => {
            top10(client).await?;
        }
        Commands::Recommend(args) => {
            recommend::run(client, args).await?;
        }
        Commands::Favorites { command } => match command {
            FavoritesCommand::List => {
                favorites(client).await?;
            }
            FavoritesCommand::Add { recipe_id } => {
                client.add_favorite(recipe_id).await?;
                println!("즐겨찾기에 추가했습니다.");
            }
            FavoritesCommand::Remove { recipe_id } => {
                client.remove_favorite(recipe_id).await?;
                println!("즐겨찾기에서 제거했습니다.");
            }
        },
        Commands::Rate {
            recipe_id,
            score,
            user_recipe,
        } => {
            if !(0.5..=5.0).contains(&score) {
                bail!("평점은 0.5에서 5.0 사이여야 합니다");
            }
            let recipe_type = if user_recipe {
                RecipeType::User
            } else {
                RecipeType::Public
            };
            client
                .rate(&RateRequest {
                    recipe_id,
                    recipe_type,
                    rating_score: score,
                    like_flag: score >= 4.0,
                })
                .await?;
            println!("평점 {score}점이 등록되었습니다.");
        }
        Commands::Ratings { command } => match command {
            RatingsCommand::List => {
                my_ratings(client).await?;
            }
            RatingsCommand::Update {
                recipe_id,
                score,
                user_recipe,
            } => {
                if !(0.5..=5.0).contains(&score) {
                    bail!("평점은 0.5에서 5.0 사이여야 합니다");
                }
                let recipe_type = if user_recipe {
                    RecipeType::User
                } else {
                    RecipeType::Public
                };
                client
                    .update_rating(&RateRequest {
                        recipe_id,
                        recipe_type,
                        rating_score: score,
                        like_flag: score >= 4.0,
                    })
                    .await?;
                println!("평점이 수정되었습니다.");
            }
            RatingsCommand::Delete { rating_id } => {
                client.delete_rating(rating_id).await?;
                println!("평점을 삭제했습니다.");
            }
        },
        Commands::Board { command } => {
            board(client, command).await?;
        }
        Commands::Recipes { command } => {
            recipes(client, command).await?;
        }
    }

    Ok(())
}

fn build_client(server: Option<&str>) -> Result<ApiClient> {
    let mut config = Config::from_env();
    if let Some(server) = server {
        config = config.with_base_url(server);
    }
    let session = Arc::new(Session::new(Box::new(DiskTokenStore::new(
        config.token_file.clone(),
    ))));
    ApiClient::connect(&config, session).context("failed to build HTTP client")
}

fn confirm(prompt: &str) -> Result<bool> {
    use std::io::Write;
    print!("{prompt}");
    std::io::stdout().flush()?;
    let mut line = String::new();
    std::io::stdin().read_line(&mut line)?;
    Ok(matches!(line.trim(), "y" | "Y"))
}

async fn profile(
    client: &ApiClient,
    username: Option<String>,
    email: Option<String>,
    password: Option<String>,
) -> Result<()> {
    let current = client.profile().await?;
    if username.is_none() && email.is_none() && password.is_none() {
        println!("사용자명: {}", current.username);
        println!("이메일:   {}", current.email);
        return Ok(());
    }

    let Some(password) = password else {
        bail!("프로필 변경에는 --password 가 필요합니다");
    };
    client
        .update_profile(&ProfileUpdate {
            username: username.unwrap_or(current.username),
            email: email.unwrap_or(current.email),
            password,
        })
        .await?;
    println!("프로필이 수정되었습니다.");
    Ok(())
}

async fn search(client: &ApiClient, ingredients: &str) -> Result<()> {
    let results = client.search_recipes(ingredients).await?;
    if results.is_empty() {
        println!("검색 결과가 없습니다.");
        return Ok(());
    }
    for recipe in &results {
        // Per-result rating lookups are best-effort decoration.
        let rating = match recipe.id() {
            Some(id) => client
                .rating_average(recipe.recipe_type(), id)
                .await
                .ok()
                .map(|r| format!(" ★{:.1}", r.average_rating))
                .unwrap_or_default(),
            None => String::new(),
        };
        println!("{}{rating}", recipe.title());
        if let Some(url) = recipe.image_url() {
            println!("  {url}");
        }
    }
    Ok(())
}

async fn detail(client: &ApiClient, title: &str, shopping: bool) -> Result<()> {
    let detail = client.recipe_detail(title).await?;

    if let Some(public) = detail.public_recipe() {
        print_recipe(&normalize_recipe(public), shopping);
    }
    for user_recipe in detail.user_recipes() {
        println!("--- 등록된 나만의 레시피 ---");
        print_recipe(&normalize_recipe(user_recipe), shopping);
    }
    if detail.public_recipe().is_none() && detail.user_recipes().is_empty() {
        println!("레시피를 찾을 수 없습니다: {title}");
    }
    Ok(())
}

fn print_recipe(view: &fridgechef_core::RecipeView, shopping: bool) {
    println!("{}", view.title);
    if let Some(url) = &view.image_url {
        println!("{url}");
    }
    if let Some(difficulty) = &view.difficulty {
        println!("난이도: {difficulty}");
    }
    if !view.cook_time.is_empty() {
        println!("조리 시간: {}", view.cook_time);
    }
    if let Some(nutrition) = &view.nutrition {
        println!("열량: {nutrition}");
    }

    if !view.ingredients.is_empty() {
        println!("\n[재료]");
        for ingredient in &view.ingredients {
            if shopping {
                println!("- {ingredient}  (검색어: {})", shopping_query(ingredient));
            } else {
                println!("- {ingredient}");
            }
        }
    }
    if !view.steps.is_empty() {
        println!("\n[조리 순서]");
        for (i, step) in view.steps.iter().enumerate() {
            println!("{}. {step}", i + 1);
        }
    }
    println!();
}

async fn top10(client: &ApiClient) -> Result<()> {
    let entries = client.top10().await?;
    if entries.is_empty() {
        println!("아직 평가된 레시피가 없습니다.");
        return Ok(());
    }
    for (rank, entry) in entries.iter().enumerate() {
        // Title lookups can fail for delisted recipes; fall back to the id.
        let title = match client.recipe_by_id(entry.recipe_id).await {
            Ok(recipe) => recipe.title().to_string(),
            Err(_) => format!("레시피 {}", entry.recipe_id),
        };
        println!("{:2}. ★{:.1}  {title}", rank + 1, entry.average_rating);
    }
    Ok(())
}

async fn favorites(client: &ApiClient) -> Result<()> {
    let favorites = client.favorites().await?;
    if favorites.is_empty() {
        println!("즐겨찾기한 레시피가 없습니다.");
        return Ok(());
    }
    for favorite in &favorites {
        let title = match client.recipe_by_id(favorite.recipe_id).await {
            Ok(recipe) => recipe.title().to_string(),
            Err(_) => format!("레시피 {}", favorite.recipe_id),
        };
        println!("{:6}  {title}", favorite.recipe_id);
    }
    Ok(())
}

async fn my_ratings(client: &ApiClient) -> Result<()> {
    let ratings = client.my_ratings().await?;
    if ratings.is_empty() {
        println!("등록한 평점이 없습니다.");
        return Ok(());
    }
    for rating in &ratings {
        let score = rating
            .rating_score
            .map(|s| format!("★{s:.1}"))
            .unwrap_or_else(|| "-".to_string());
        let name = if rating.recipe_name.is_empty() {
            format!("레시피 {}", rating.recipe_id)
        } else {
            rating.recipe_name.clone()
        };
        println!("#{:<5} {score}  {name}", rating.rating_id);
    }
    Ok(())
}

async fn board(client: &ApiClient, command: BoardCommand) -> Result<()> {
    match command {
        BoardCommand::List { mine } => {
            let posts = if mine {
                client.my_board_posts().await?
            } else {
                client.board_posts().await?
            };
            if posts.is_empty() {
                println!("게시글이 없습니다.");
                return Ok(());
            }
            for post in &posts {
                let author = post
                    .user
                    .as_ref()
                    .and_then(|u| u.username.clone())
                    .unwrap_or_else(|| "익명".to_string());
                let date = post.created_at.as_deref().unwrap_or("");
                println!("#{:<5} {}  ({author} {date})", post.board_id, post.title);
            }
        }
        BoardCommand::Post { title, content } => {
            client.create_post(&title, &content).await?;
            println!("게시글이 등록되었습니다.");
        }
        BoardCommand::Edit {
            board_id,
            title,
            content,
        } => {
            client.update_post(board_id, &title, &content).await?;
            println!("게시글이 수정되었습니다.");
        }
        BoardCommand::Delete { board_id } => {
            client.delete_post(board_id).await?;
            println!("게시글이 삭제되었습니다.");
        }
        BoardCommand::Comments { board_id } => {
            print_comments(client, board_id).await?;
        }
        BoardCommand::Comment {
            board_id,
            content,
            reply_to,
        } => {
            client.add_comment(board_id, &content, reply_to).await?;
            println!("댓글이 등록되었습니다.");
        }
        BoardCommand::DeleteComment { comment_id } => {
            client.delete_comment(comment_id).await?;
            println!("댓글이 삭제되었습니다.");
        }
    }
    Ok(())
}

async fn print_comments(client: &ApiClient, board_id: i64) -> Result<()> {
    let comments = client.comments(board_id).await?;
    if comments.is_empty() {
        println!("댓글이 없습니다.");
        return Ok(());
    }
    // Single-level threading: top-level comments first, replies indented
    // under their parent.
    for comment in comments.iter().filter(|c| c.parent_id.is_none()) {
        print_comment(comment, "");
        if let Some(id) = comment.comment_id {
            for reply in comments.iter().filter(|c| c.parent_id == Some(id)) {
                print_comment(reply, "    ↳ ");
            }
        }
    }
    Ok(())
}

fn print_comment(comment: &fridgechef_core::models::Comment, indent: &str) {
    let author = comment
        .user
        .as_ref()
        .and_then(|u| u.username.clone())
        .unwrap_or_else(|| "익명".to_string());
    let id = comment
        .comment_id
        .map(|id| format!("#{id} "))
        .unwrap_or_default();
    println!("{indent}{id}{author}: {}", comment.content);
}

async fn recipes(client: &ApiClient, command: RecipesCommand) -> Result<()> {
    match command {
        RecipesCommand::Mine => {
            let recipes = client.my_recipes().await?;
            if recipes.is_empty() {
                println!("등록한 레시피가 없습니다.");
                return Ok(());
            }
            for recipe in &recipes {
                println!("#{:<5} {}", recipe.user_recipe_id, recipe.name);
                if !recipe.base_recipe_name.is_empty() {
                    println!("       원본: {}", recipe.base_recipe_name);
                }
            }
        }
        RecipesCommand::Upload {
            name,
            description,
            ingredients,
            image_url,
            base_recipe,
        } => {
            client
                .create_user_recipe(&UserRecipeUpsert {
                    name,
                    description,
                    image_url,
                    ingredients,
                    base_recipe_name: base_recipe,
                })
                .await?;
            println!("레시피가 등록되었습니다.");
        }
        RecipesCommand::Edit {
            user_recipe_id,
            name,
            description,
            ingredients,
            image_url,
            base_recipe,
        } => {
            client
                .update_user_recipe(
                    user_recipe_id,
                    &UserRecipeUpsert {
                        name,
                        description,
                        image_url,
                        ingredients,
                        base_recipe_name: base_recipe,
                    },
                )
                .await?;
            println!("레시피가 수정되었습니다.");
        }
        RecipesCommand::Delete { user_recipe_id } => {
            client.delete_user_recipe(user_recipe_id).await?;
            println!("레시피가 삭제되었습니다.");
        }
    }
    Ok(())
}
