//! Command-line surface.

use clap::{Args, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(
    name = "rosterctl",
    about = "Console for managing user records against a remote directory service",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Authenticate against the directory service and store the session
    Login {
        /// Account email
        #[arg(long)]
        email: String,
        /// Account password
        #[arg(long)]
        password: String,
    },
    /// Drop the stored session
    Logout,
    /// Show the merged user list (remote page + local records)
    List {
        /// Page to fetch
        #[arg(long, default_value_t = 1)]
        page: u32,
        /// Case-insensitive name/email filter applied to the merged page
        #[arg(long, default_value = "")]
        query: String,
    },
    /// Create a user (kept locally once the service acknowledges)
    Create(UserFields),
    /// Update a user by id
    Update {
        /// Id of the record to update
        id: String,
        #[command(flatten)]
        fields: UserFields,
    },
    /// Delete a user by id
    Delete {
        /// Id of the record to delete
        id: String,
    },
}

#[derive(Debug, Args)]
pub struct UserFields {
    #[arg(long)]
    pub email: String,
    #[arg(long)]
    pub first_name: String,
    #[arg(long)]
    pub last_name: String,
    /// Profile image URL
    #[arg(long, default_value = "")]
    pub avatar: String,
}
