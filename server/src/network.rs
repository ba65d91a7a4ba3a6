//! Server network layer: WebSocket connections feeding the session loop

use crate::client_manager::{ConnectionId, Outbound};
use crate::session::Session;
use futures_util::{SinkExt, StreamExt};
use log::{debug, error, info, warn};
use shared::{Clock, GameConfig, ProtocolError, SystemClock};
use std::net::SocketAddr;
use std::sync::Arc;
use thiserror::Error;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::{mpsc, oneshot};
use tokio::time::{interval, MissedTickBehavior};
use tokio_tungstenite::{accept_async, tungstenite::Message};

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("failed to bind: {0}")]
    Bind(#[from] std::io::Error),
    #[error("websocket error: {0}")]
    WebSocket(#[from] tokio_tungstenite::tungstenite::Error),
}

/// Messages sent from connection tasks to the session loop
#[derive(Debug)]
pub enum ServerEvent {
    Connected {
        sender: Outbound,
        reply: oneshot::Sender<ConnectionId>,
    },
    TextReceived {
        connection: ConnectionId,
        text: String,
    },
    Disconnected {
        connection: ConnectionId,
    },
}

/// Accepts WebSocket clients and drives the session on a fixed tick.
pub struct Server<C: Clock = SystemClock> {
    listener: TcpListener,
    session: Session<C>,
    events_tx: mpsc::UnboundedSender<ServerEvent>,
    events_rx: mpsc::UnboundedReceiver<ServerEvent>,
}

impl Server<SystemClock> {
    pub async fn bind(addr: &str, config: GameConfig) -> Result<Self, ServerError> {
        Self::with_clock(addr, config, SystemClock).await
    }
}

impl<C: Clock> Server<C> {
    pub async fn with_clock(addr: &str, config: GameConfig, clock: C) -> Result<Self, ServerError> {
        let listener = TcpListener::bind(addr).await?;
        info!("Server listening on ws://{}", listener.local_addr()?);

        let (events_tx, events_rx) = mpsc::unbounded_channel();

        Ok(Server {
            listener,
            session: Session::new(config, clock),
            events_tx,
            events_rx,
        })
    }

    pub fn local_addr(&self) -> Result<SocketAddr, ServerError> {
        Ok(self.listener.local_addr()?)
    }

    /// Runs until the session terminates.
    pub async fn run(self) -> Result<(), ServerError> {
        let Server {
            listener,
            mut session,
            events_tx,
            mut events_rx,
        } = self;

        let acceptor = tokio::spawn(accept_loop(listener, events_tx));

        let mut tick_interval = interval(session.config().tick_duration());
        tick_interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

        info!(
            "Waiting for {} players to connect...",
            session.config().players_to_start
        );

        loop {
            tokio::select! {
                event = events_rx.recv() => {
                    match event {
                        Some(event) => Self::handle_event(&mut session, event),
                        None => break,
                    }
                },
                _ = tick_interval.tick() => {
                    session.tick();
                },
            }

            if session.is_terminated() {
                info!("Session over, shutting down");
                break;
            }
        }

        acceptor.abort();
        Ok(())
    }

    fn handle_event(session: &mut Session<C>, event: ServerEvent) {
        match event {
            ServerEvent::Connected { sender, reply } => {
                let connection = session.connect(sender);
                if reply.send(connection).is_err() {
                    // Connection task died before learning its id.
                    session.disconnect(connection);
                }
            }
            ServerEvent::TextReceived { connection, text } => {
                session.receive(connection, &text);
            }
            ServerEvent::Disconnected { connection } => {
                session.disconnect(connection);
            }
        }
    }
}

async fn accept_loop(listener: TcpListener, events_tx: mpsc::UnboundedSender<ServerEvent>) {
    loop {
        match listener.accept().await {
            Ok((stream, addr)) => {
                let events_tx = events_tx.clone();
                tokio::spawn(async move {
                    if let Err(e) = handle_connection(stream, addr, events_tx).await {
                        warn!("Connection {} failed: {}", addr, e);
                    }
                });
            }
            Err(e) => {
                error!("Error accepting connection: {}", e);
            }
        }
    }
}

/// Performs the WebSocket handshake, registers with the session, then pumps
/// frames in both directions until either side closes.
async fn handle_connection(
    stream: TcpStream,
    addr: SocketAddr,
    events_tx: mpsc::UnboundedSender<ServerEvent>,
) -> Result<(), ServerError> {
    let ws = accept_async(stream).await?;
    debug!("WebSocket handshake completed with {}", addr);
    let (mut write, mut read) = ws.split();

    let (out_tx, mut out_rx) = mpsc::unbounded_channel::<Arc<str>>();
    let (reply_tx, reply_rx) = oneshot::channel();
    if events_tx
        .send(ServerEvent::Connected {
            sender: out_tx,
            reply: reply_tx,
        })
        .is_err()
    {
        return Ok(());
    }
    let Ok(connection) = reply_rx.await else {
        return Ok(());
    };

    let writer = tokio::spawn(async move {
        while let Some(payload) = out_rx.recv().await {
            if let Err(e) = write.send(Message::Text(payload.to_string())).await {
                debug!("Write to connection {} failed: {}", connection, e);
                break;
            }
        }
        let _ = write.close().await;
    });

    while let Some(frame) = read.next().await {
        match frame {
            Ok(Message::Text(text)) => {
                if events_tx
                    .send(ServerEvent::TextReceived { connection, text })
                    .is_err()
                {
                    break;
                }
            }
            Ok(Message::Close(_)) => break,
            Ok(Message::Binary(_)) => {
                warn!(
                    "Ignoring frame from connection {}: {}",
                    connection,
                    ProtocolError::UnsupportedFrame
                );
            }
            Ok(_) => {}
            Err(e) => {
                debug!("Read from connection {} failed: {}", connection, e);
                break;
            }
        }
    }

    let _ = events_tx.send(ServerEvent::Disconnected { connection });
    writer.abort();
    info!("Connection {} from {} closed", connection, addr);
    Ok(())
}
