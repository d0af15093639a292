use clap::Args;

#[derive(Debug, Args)]
pub struct Config {
    #[clap(long, env, default_value_t = String::from("127.0.0.1"))]
    pub host: String,
    #[clap(short, long, env, default_value_t = 7205)]
    pub port: u16,

    #[clap(long, env, default_value_t = String::from("production"))]
    pub env: String,

    /// Path to the SQLite database file
    #[clap(long = "db", env)]
    pub database_url: String,

    #[clap(long, env, default_value_t = 16)]
    pub database_pool_size: usize,

    #[clap(long, env, default_value_t = String::from(trip_planner_auth::session::SESSION_COOKIE_NAME))]
    pub session_cookie_name: String,

    /// Argon2 memory cost for new password hashes, in KiB
    #[clap(long, env, default_value_t = 19 * 1024)]
    pub password_memory_cost: u32,

    /// Argon2 iteration count for new password hashes
    #[clap(long, env, default_value_t = 2)]
    pub password_iterations: u32,

    #[clap(long, env)]
    pub honeycomb_team: Option<String>,
    #[clap(long, env, default_value_t = String::from("trip-planner"))]
    pub honeycomb_dataset: String,
}

impl Config {
    pub fn production(&self) -> bool {
        self.env != "development" && !cfg!(debug_assertions)
    }
}
