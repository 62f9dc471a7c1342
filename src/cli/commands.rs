//! Command implementations cho CryptoBridge CLI.
//!
//! Mỗi subcommand map sang một `Operation` rồi đi qua dispatch controller.
//! Auth và delete-account là các lệnh quản lý tài khoản, không phải
//! cryptographic operation.

use crate::cli::Commands;
use anyhow::{bail, Context, Result};
use colored::Colorize;
use cryptobridge::auth::{load_credentials_from_file, save_credentials_to_file, Credentials};
use cryptobridge::config::{default_credentials_path, Config};
use cryptobridge::ops::Operation;
use cryptobridge::CryptoClient;
use indicatif::{ProgressBar, ProgressStyle};
use std::io::{self, Write};
use std::time::Duration;

/// Chạy một subcommand bất kỳ
pub fn run(command: Commands) -> Result<()> {
    match command {
        Commands::Auth { token, user_id } => save_auth(token, user_id),
        Commands::DeleteAccount => delete_account(),
        other => run_operation(to_operation(other)),
    }
}

/// Map CLI arguments sang operation snapshot
fn to_operation(command: Commands) -> Operation {
    match command {
        Commands::GeneratePassword {
            length,
            no_uppercase,
            no_lowercase,
            no_numbers,
            no_symbols,
        } => Operation::GeneratePassword {
            length,
            use_uppercase: !no_uppercase,
            use_lowercase: !no_lowercase,
            use_numbers: !no_numbers,
            use_symbols: !no_symbols,
        },

        Commands::GenerateKey {
            name,
            key_type,
            symmetric_algorithm,
            asymmetric_algorithm,
        } => Operation::GenerateKey {
            key_type,
            symmetric_algorithm,
            asymmetric_algorithm,
            key_name: name,
        },

        Commands::EncryptSymmetric {
            file,
            algorithm,
            mode,
            iv,
            key_file,
        } => Operation::EncryptSymmetric {
            file,
            algorithm,
            mode,
            iv,
            key_file,
        },

        Commands::DecryptSymmetric {
            file,
            algorithm,
            mode,
            iv,
            key_file,
        } => Operation::DecryptSymmetric {
            file,
            algorithm,
            mode,
            iv,
            key_file,
        },

        Commands::EncryptAsymmetric {
            file,
            algorithm,
            public_key,
        } => Operation::EncryptAsymmetric {
            file,
            algorithm,
            public_key_file: public_key,
        },

        Commands::DecryptAsymmetric {
            file,
            algorithm,
            private_key,
        } => Operation::DecryptAsymmetric {
            file,
            algorithm,
            private_key_file: private_key,
        },

        Commands::HashFile { file, algorithm } => Operation::HashFile { file, algorithm },

        Commands::CompareHash { file_a, file_b } => Operation::CompareHash { file_a, file_b },

        Commands::ShareKey {
            name,
            parameter_size,
            mode,
            received_value,
        } => Operation::ShareKey {
            parameter_size,
            key_name: name,
            exchange_mode: mode,
            received_value,
        },

        // Đã xử lý ở run()
        Commands::Auth { .. } | Commands::DeleteAccount => {
            unreachable!("account commands are not operations")
        }
    }
}

/// Dispatch operation và in kết quả
fn run_operation(op: Operation) -> Result<()> {
    let config = Config::load_default()?;
    let credentials = load_credentials_from_file(&default_credentials_path()).ok();
    let mut client = CryptoClient::new(&config, credentials);

    // Spinner chỉ cho các operation có network call
    let spinner = if op.is_local() {
        None
    } else {
        Some(make_spinner())
    };

    let result = client.dispatch(op);

    if let Some(spinner) = spinner {
        spinner.finish_and_clear();
    }

    let outcome = result?;
    println!("{} {}", "✓".green(), outcome.message);
    for path in &outcome.saved {
        println!(
            "  {} Saved: {}",
            "✓".green(),
            path.display().to_string().cyan()
        );
    }

    Ok(())
}

fn make_spinner() -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.cyan} {msg}")
            .unwrap(),
    );
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner.set_message("Waiting for the crypto service...");
    spinner
}

/// Lưu bearer credentials để dùng cho các lệnh cần authentication
fn save_auth(token: String, user_id: String) -> Result<()> {
    let credentials = Credentials {
        access_token: token,
        user_id,
    };
    let path = default_credentials_path();
    save_credentials_to_file(&credentials, &path)?;
    println!(
        "  {} Saved credentials: {}",
        "✓".green(),
        path.display().to_string().dimmed()
    );
    Ok(())
}

/// Xóa tài khoản - yêu cầu gõ đúng câu xác nhận, giống web UI gốc
fn delete_account() -> Result<()> {
    println!(
        "{}",
        "WARNING: This permanently deletes your account and all associated data!".yellow()
    );
    print!("Type 'delete my account' to confirm: ");
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    if input.trim() != "delete my account" {
        bail!("Confirmation text did not match, account not deleted");
    }

    let config = Config::load_default()?;
    let creds_path = default_credentials_path();
    let credentials = load_credentials_from_file(&creds_path)
        .context("Not signed in - run `cbr auth` first")?;
    let client = CryptoClient::new(&config, Some(credentials));

    client.delete_account()?;

    // Account không còn nữa -> bỏ credentials local luôn
    if creds_path.exists() {
        std::fs::remove_file(&creds_path)?;
    }

    println!("{}", "Account deleted.".green().bold());
    Ok(())
}
