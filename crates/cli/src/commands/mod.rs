pub mod fix_types;
pub mod pull;

/// Prefix of every user-facing line.
pub const PREFIX: &str = "[i18n]";

pub async fn run_cli_async<F, Fut>(f: F) -> i32
where
    F: FnOnce() -> Fut,
    Fut: std::future::Future<Output = Result<(), String>>,
{
    report(f().await)
}

/// Map a command result to an exit code, printing the failure on stderr.
pub fn report(result: Result<(), String>) -> i32 {
    match result {
        Ok(()) => 0,
        Err(err) => {
            eprintln!("{PREFIX} Failed: {err}");
            1
        }
    }
}
