//! Headless mode execution

use super::{
    SessionData,
    messages::{print_session_exit_success, print_session_shutdown, print_session_starting},
};
use crate::events::Event;
use std::error::Error;

/// Runs the dashboard without a terminal UI
///
/// Activity events are printed to stdout until Ctrl+C. The countdown, polling
/// and countdown-triggered rebalances keep running exactly as in TUI mode.
pub async fn run_headless_mode(mut session: SessionData) -> Result<(), Box<dyn Error>> {
    print_session_starting("headless", &session.base_url);

    // Trigger shutdown on Ctrl+C
    let shutdown_sender_clone = session.shutdown_sender.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            let _ = shutdown_sender_clone.send(());
        }
    });

    let mut shutdown_receiver = session.shutdown_sender.subscribe();

    // Event loop: log events to console until shutdown
    loop {
        tokio::select! {
            Some(event) = session.event_receiver.recv() => {
                if let Some(line) = headless_line(&event) {
                    println!("{}", line);
                }
            }
            _ = shutdown_receiver.recv() => {
                break;
            }
        }
    }

    print_session_shutdown();
    for handle in session.join_handles {
        let _ = handle.await;
    }
    print_session_exit_success();

    Ok(())
}

fn headless_line(event: &Event) -> Option<String> {
    event.should_display().then(|| event.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::{EventType, Source};
    use crate::logging::LogLevel;

    #[test]
    fn info_events_are_printed() {
        let event = Event::new(
            Source::Countdown,
            "Timer paused".to_string(),
            EventType::StateChange,
            LogLevel::Info,
        );
        let line = headless_line(&event).unwrap();
        assert!(line.ends_with("Countdown: Timer paused"));
    }
}
