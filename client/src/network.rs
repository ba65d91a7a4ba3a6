use crate::game::{ClientGameState, SharedGameState};
use crate::input::InputDirection;
use futures_util::stream::SplitSink;
use futures_util::{SinkExt, StreamExt};
use log::{info, warn};
use shared::{encode, ProtocolError};
use std::sync::MutexGuard;
use std::time::Duration;
use tokio::net::TcpStream;
use tokio::sync::watch;
use tokio::time::{interval, MissedTickBehavior};
use tokio_tungstenite::tungstenite::{self, Message};
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};

type Writer = SplitSink<WebSocketStream<MaybeTlsStream<TcpStream>>, Message>;

/// Poisoning only means another loop panicked mid-update; the state is still usable.
pub fn lock_state(state: &SharedGameState) -> MutexGuard<'_, ClientGameState> {
    state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Connects to `url` and runs until the server closes the connection.
///
/// Incoming messages feed `state`; the latest direction on `input_rx` is sent
/// `input_rate` times per second once the game has started. The state is
/// marked disconnected on every exit path.
pub async fn run(
    url: &str,
    state: SharedGameState,
    input_rx: watch::Receiver<InputDirection>,
    input_rate: u32,
) -> Result<(), tungstenite::Error> {
    let result = session(url, &state, input_rx, input_rate).await;
    lock_state(&state).mark_disconnected();
    result
}

async fn session(
    url: &str,
    state: &SharedGameState,
    input_rx: watch::Receiver<InputDirection>,
    input_rate: u32,
) -> Result<(), tungstenite::Error> {
    info!("Connecting to {}", url);
    let (stream, _) = connect_async(url).await?;
    info!("Connected");

    let (write, mut read) = stream.split();
    let input_task = tokio::spawn(send_inputs(write, state.clone(), input_rx, input_rate));

    let result = loop {
        match read.next().await {
            Some(Ok(Message::Text(text))) => {
                let handled = lock_state(state).handle_text(&text);
                if let Err(e) = handled {
                    warn!("Ignoring server message: {}", e);
                }
            }
            Some(Ok(Message::Binary(_))) => {
                warn!("Ignoring server frame: {}", ProtocolError::UnsupportedFrame);
            }
            Some(Ok(Message::Close(_))) | None => break Ok(()),
            Some(Ok(_)) => {}
            Some(Err(e)) => break Err(e),
        }
    };

    input_task.abort();
    result
}

async fn send_inputs(
    mut write: Writer,
    state: SharedGameState,
    input_rx: watch::Receiver<InputDirection>,
    input_rate: u32,
) {
    let mut ticker = interval(Duration::from_secs_f64(1.0 / input_rate.max(1) as f64));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        ticker.tick().await;

        if !lock_state(&state).should_send_input() {
            continue;
        }

        let direction = *input_rx.borrow();
        let payload = match encode(&direction.to_message()) {
            Ok(payload) => payload,
            Err(e) => {
                warn!("Failed to encode input: {}", e);
                continue;
            }
        };

        if let Err(e) = write.send(Message::Text(payload)).await {
            warn!("Failed to send input: {}", e);
            break;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ClientConfig;
    use shared::{decode_client, ClientMessage, PlayerView, ServerMessage, Snapshot};
    use tokio::net::TcpListener;
    use tokio::time::timeout;
    use tokio_tungstenite::accept_async;

    const INIT: &str = r#"{"type":"init","player_id":"player_0","game_width":500,"game_height":375,"player_radius":25,"coin_radius":15}"#;

    fn update(timestamp: f64) -> String {
        encode(&ServerMessage::StateUpdate(Snapshot {
            timestamp,
            players: vec![PlayerView {
                id: "player_0".to_string(),
                x: 100.0,
                y: 100.0,
                score: 0,
                color: [200, 100, 50],
            }],
            coins: vec![],
        }))
        .unwrap()
    }

    #[tokio::test]
    async fn test_receives_messages_and_sends_input_after_start() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let url = format!("ws://{}", listener.local_addr().unwrap());

        let state = ClientGameState::shared(&ClientConfig::default());
        let (_input_tx, input_rx) = watch::channel(InputDirection { x: 1, y: -1 });
        let client = tokio::spawn({
            let state = state.clone();
            async move { run(&url, state, input_rx, 60).await }
        });

        let (tcp, _) = listener.accept().await.unwrap();
        let mut ws = accept_async(tcp).await.unwrap();

        ws.send(Message::Text(INIT.to_string())).await.unwrap();
        ws.send(Message::Text(r#"{"type":"bogus"}"#.to_string()))
            .await
            .unwrap();
        ws.send(Message::Text(r#"{"type":"game_start"}"#.to_string()))
            .await
            .unwrap();
        ws.send(Message::Text(update(10.0))).await.unwrap();
        ws.send(Message::Text(update(10.1))).await.unwrap();

        let input = timeout(Duration::from_secs(5), async {
            loop {
                if let Some(Ok(Message::Text(text))) = ws.next().await {
                    return decode_client(&text).unwrap();
                }
            }
        })
        .await
        .unwrap();
        assert_eq!(
            input,
            ClientMessage::Input {
                input_x: 1.0,
                input_y: -1.0
            }
        );

        timeout(Duration::from_secs(5), async {
            while lock_state(&state).buffered_snapshots() < 2 {
                tokio::time::sleep(Duration::from_millis(10)).await;
            }
        })
        .await
        .unwrap();
        {
            let state = lock_state(&state);
            assert_eq!(state.player_id.as_deref(), Some("player_0"));
            assert!(state.game_started);
        }

        ws.close(None).await.unwrap();
        let result = timeout(Duration::from_secs(5), client).await.unwrap().unwrap();
        tokio_test::assert_ok!(result);
        assert!(!lock_state(&state).running);
    }

    #[tokio::test]
    async fn test_connection_failure_marks_disconnected() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let url = format!("ws://{}", listener.local_addr().unwrap());
        drop(listener);

        let state = ClientGameState::shared(&ClientConfig::default());
        let (_input_tx, input_rx) = watch::channel(InputDirection::default());

        let result = run(&url, state.clone(), input_rx, 60).await;
        tokio_test::assert_err!(result);
        assert!(!lock_state(&state).running);
    }
}
