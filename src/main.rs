use chess_rules::config::AppConfig;
use chess_rules::console;
use chess_rules::engine::Match;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Logs go to stderr so they never interleave with the board on stdout.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "chess_rules=info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = AppConfig::from_env();
    tracing::info!(
        highlight = config.highlight_moves,
        snapshot_json = config.snapshot_json,
        "chess-rules v{} starting",
        env!("CARGO_PKG_VERSION")
    );

    let mut game = Match::new();
    console::run(&mut game, std::io::stdin().lock(), std::io::stdout().lock(), &config)?;

    tracing::info!(match_id = %game.id, turns = game.turn(), status = %game.status(), "session ended");
    Ok(())
}
