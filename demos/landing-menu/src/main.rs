//! A terminal stand-in for the game's landing menu.
//!
//! ```text
//! cargo run -p landing-menu -- <username> <password> [new|resume|signup]
//! ```
//!
//! Logs in against `WAYPOINT_BASE_URL` (or the default backend), prints
//! the menu the game would show, then starts or resumes a game. Scene
//! loads are printed instead of rendered; save markers live in
//! `./waypoint-saves`.

use std::time::Duration;

use waypoint::prelude::*;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    waypoint::telemetry::init_tracing();

    let mut args = std::env::args().skip(1);
    let (Some(username), Some(password)) = (args.next(), args.next()) else {
        eprintln!("usage: landing-menu <username> <password> [new|resume|signup]");
        std::process::exit(2);
    };
    let choice = args.next().unwrap_or_else(|| "resume".to_string());

    let client = WaypointClient::builder()
        .config(ClientConfig::from_env()?)
        .build_http(FileMarkerStore::open("waypoint-saves")?, |scene: &str| {
            println!(">> loading scene {scene}");
        })?;

    let login = if choice == "signup" {
        client.signup(&username, &password).await
    } else {
        client.login(&username, &password).await
    };
    let menu = match login {
        Ok(menu) => menu,
        Err(e) => {
            println!("{}", e.user_message().unwrap_or("Something went wrong."));
            tracing::debug!(error = %e, "login failed");
            return Ok(());
        }
    };

    println!("Welcome, {username}!");
    println!("  [new]    Start new game");
    if menu.can_resume {
        println!("  [resume] Continue ({:?})", menu.resume_signal);
    }

    let transition = if choice == "new" || !menu.can_resume {
        client.start_new_game().await?
    } else {
        client.resume().await?
    };
    let checkpoint = client.enter_scene(transition.scene.clone());

    // One simulated run through the level.
    client.start_run();
    for _ in 0..90 {
        client.advance_run(Duration::from_millis(16));
    }
    println!("run time {}", format_elapsed(client.run_elapsed()));

    if let Ok(level_id) = transition.scene.parse::<i32>() {
        let result = client.finish_level(level_id).await?;
        println!("{}", result.title());
        if result.board.is_none() {
            println!("(leaderboard unavailable)");
        }
        for row in &result.rows {
            println!("  {row}");
        }
        let _ = result.submission.await;
    }

    let _ = checkpoint.await;
    client.return_to_menu();
    Ok(())
}
