use anyhow::{anyhow, Context};
use chrono::Utc;
use clap::{Args, Subcommand};

use trip_planner_auth::PasswordHasher;
use trip_planner_db::{
    self as db,
    users::{NewUser, User},
    PoolExt, RecordStore,
};

#[derive(Debug, Args)]
pub struct AdminArgs {
    /// Path to the SQLite database file
    #[clap(long = "db", env = "DATABASE_URL", global = true)]
    database_url: Option<String>,

    #[clap(subcommand)]
    commands: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Create a user account.
    ///
    /// This is how the first admin gets into a fresh database.
    AddUser(AddUser),
    /// Hash a password
    HashPassword(HashPassword),
    /// Delete every session that has expired
    PruneSessions,
}

#[derive(Debug, Args)]
pub struct AddUser {
    username: String,
    password: String,
    /// Give the user admin rights
    #[clap(long)]
    admin: bool,
}

#[derive(Debug, Args)]
pub struct HashPassword {
    /// The password to hash
    password: String,
}

pub async fn admin_commands(cmd: AdminArgs) -> Result<(), anyhow::Error> {
    match cmd.commands {
        Commands::AddUser(args) => add_user(cmd.database_url, args).await?,
        Commands::HashPassword(HashPassword { password }) => hash_password(password)?,
        Commands::PruneSessions => prune_sessions(cmd.database_url).await?,
    }

    Ok(())
}

async fn open_database(database_url: Option<String>) -> Result<db::Pool, anyhow::Error> {
    let database_url =
        database_url.ok_or_else(|| anyhow!("Set DATABASE_URL or pass --db to use this command"))?;
    let pool = db::connect(database_url.as_str(), 1)?;
    db::run_migrations(&pool).await?;
    Ok(pool)
}

async fn add_user(database_url: Option<String>, args: AddUser) -> Result<(), anyhow::Error> {
    if args.username.is_empty() || args.password.is_empty() {
        return Err(anyhow!("Username and password must not be empty"));
    }

    let pool = open_database(database_url).await?;
    let hash = PasswordHasher::default().hash(args.password.as_str())?;

    let result = pool
        .create_record::<User>(NewUser::new(args.username.as_str(), hash, args.admin))
        .await;

    let user = match result {
        Ok(user) => user,
        Err(db::Error::Db(e)) if db::users::is_unique_violation(&e) => {
            return Err(anyhow!("User {} already exists", args.username));
        }
        Err(e) => return Err(e).context("Creating user"),
    };

    println!("Created user {} with id {}", user.username, user.id);
    Ok(())
}

fn hash_password(password: String) -> Result<(), anyhow::Error> {
    let hash = trip_planner_auth::password::new_hash(password.as_str())?;
    println!("{hash}");
    Ok(())
}

async fn prune_sessions(database_url: Option<String>) -> Result<(), anyhow::Error> {
    let pool = open_database(database_url).await?;
    let now = Utc::now().naive_utc();

    let deleted = pool
        .interact(move |conn| db::sessions::delete_expired(conn, now).map_err(db::Error::from))
        .await?;

    println!("Deleted {deleted} expired sessions");
    Ok(())
}
