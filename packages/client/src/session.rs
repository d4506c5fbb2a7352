//! WebSocket client session.

use futures_util::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use tokio_tungstenite::{
    connect_async,
    tungstenite::{Error as WsError, protocol::Message},
};

use crate::{domain::outgoing_line, error::ClientError, formatter::MessageFormatter, ui::Console};

/// Run one connection until the input closes or the connection ends.
///
/// Returns `Ok(())` when the input channel closes (the user quit). Every
/// received frame is shown on `console`: replayed history first, then the
/// join announcement and live traffic.
pub async fn run_session(
    url: &str,
    input: &mut mpsc::UnboundedReceiver<String>,
    console: &dyn Console,
) -> Result<(), ClientError> {
    let (ws_stream, _response) = connect_async(url).await.map_err(|e| match e {
        WsError::Http(response) => ClientError::Rejected(response.status().as_u16()),
        other => ClientError::Connection(other.to_string()),
    })?;

    tracing::info!("Connected to {}", url);

    let (mut write, mut read) = ws_stream.split();

    loop {
        tokio::select! {
            frame = read.next() => match frame {
                Some(Ok(Message::Text(text))) => {
                    console.show(&MessageFormatter::format_frame(text.as_str()));
                }
                Some(Ok(Message::Binary(data))) => {
                    console.show(&MessageFormatter::format_binary_message(data.len()));
                }
                Some(Ok(Message::Close(_))) | None => {
                    return Err(ClientError::ConnectionLost(
                        "server closed the connection".to_string(),
                    ));
                }
                Some(Ok(_)) => {}
                Some(Err(e)) => return Err(ClientError::ConnectionLost(e.to_string())),
            },
            line = input.recv() => match line {
                Some(line) => {
                    let Some(content) = outgoing_line(&line) else {
                        continue;
                    };
                    write
                        .send(Message::Text(content.into()))
                        .await
                        .map_err(|e| ClientError::ConnectionLost(e.to_string()))?;
                }
                None => {
                    let _ = write.close().await;
                    return Ok(());
                }
            },
        }
    }
}
