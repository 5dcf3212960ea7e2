use clap::{Args, Subcommand};
use rand::{Rng, distributions::Alphanumeric};

use aroma_app::{
    database::{self, Db},
    domain::users::{
        PgUsersService, UsersService,
        models::{NewUser, Password, UserUuid},
    },
};

#[derive(Debug, Args)]
pub(crate) struct UserCommand {
    #[command(subcommand)]
    command: UserSubcommand,
}

#[derive(Debug, Subcommand)]
enum UserSubcommand {
    /// Create an administrator account.
    CreateAdmin(CreateAdminArgs),
}

#[derive(Debug, Args)]
struct CreateAdminArgs {
    /// Display name
    #[arg(long)]
    name: String,

    /// Login email
    #[arg(long)]
    email: String,

    /// Optional password; generated when omitted
    #[arg(long)]
    password: Option<String>,

    /// PostgreSQL connection string
    #[arg(long, env = "DATABASE_URL")]
    database_url: String,
}

pub(crate) async fn run(command: UserCommand) -> Result<(), String> {
    match command.command {
        UserSubcommand::CreateAdmin(args) => create_admin(args).await,
    }
}

async fn create_admin(args: CreateAdminArgs) -> Result<(), String> {
    let pool = database::connect(&args.database_url, 2)
        .await
        .map_err(|error| format!("failed to connect to database: {error}"))?;

    let service = PgUsersService::new(Db::new(pool));
    let password = args.password.unwrap_or_else(generate_password);

    if password.trim().is_empty() {
        return Err("password cannot be empty".to_string());
    }

    let user = service
        .register(NewUser {
            uuid: UserUuid::new(),
            name: args.name,
            email: args.email,
            password: Password::new(password.clone()),
            is_admin: true,
        })
        .await
        .map_err(|error| format!("failed to create admin user: {error}"))?;

    println!("user_uuid: {}", user.uuid);
    println!("email: {}", user.email);
    println!("password: {password}");
    println!("store this password now; it is only shown once");

    Ok(())
}

fn generate_password() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(24)
        .map(char::from)
        .collect()
}
