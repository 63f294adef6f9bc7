/********************************************************************************
 * Copyright (c) 2026 Contributors to the Eclipse Foundation
 *
 * See the NOTICE file(s) distributed with this work for additional
 * information regarding copyright ownership.
 *
 * This program and the accompanying materials are made available under the
 * terms of the Apache License Version 2.0 which is available at
 * https://www.apache.org/licenses/LICENSE-2.0
 *
 * SPDX-License-Identifier: Apache-2.0
 ********************************************************************************/

//! One subscribed nsqd connection: handshake, then a reader task feeding
//! messages to the owning subscription.

use crate::events;
use crate::frame::{
    read_frame, Command, Frame, NsqMessage, CLOSE_WAIT, HEARTBEAT, MAGIC_V2, OK,
};
use faas_connector::{BrokerMessage, ConnectorError, DeliveryTag};
use std::io;
use std::sync::Arc;
use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt};
use tokio::sync::mpsc::UnboundedSender;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

const COMPONENT: &str = "nsq_connection";

/// Write side of a connection, shared by the reader task (`NOP`) and the
/// subscription (`FIN`, `CLS`).
pub(crate) type SharedWriter = Arc<Mutex<Box<dyn AsyncWrite + Send + Unpin>>>;

#[derive(Debug)]
pub(crate) struct Delivery {
    pub(crate) connection: usize,
    pub(crate) message: NsqMessage,
}

/// What a connection's reader task reports to its subscription.
#[derive(Debug)]
pub(crate) enum ConnectionEvent {
    Delivery(Delivery),
    /// The reader stopped; the connection takes no further commands.
    Closed { connection: usize },
}

impl Delivery {
    pub(crate) fn into_broker_message(self, topic: &str) -> BrokerMessage {
        BrokerMessage {
            topic: topic.to_string(),
            body: self.message.body,
            tag: DeliveryTag {
                connection: self.connection,
                message_id: self.message.id.to_vec(),
            },
        }
    }
}

async fn write_bytes(writer: &SharedWriter, bytes: &[u8]) -> io::Result<()> {
    let mut writer = writer.lock().await;
    writer.write_all(bytes).await?;
    writer.flush().await
}

pub(crate) async fn send_command(writer: &SharedWriter, command: Command<'_>) -> io::Result<()> {
    write_bytes(writer, &command.encode()).await
}

fn handshake_error(topic: &str, err: impl std::fmt::Display) -> ConnectorError {
    ConnectorError::broker(format!("nsqd subscription to {topic} failed: {err}"))
}

/// Subscribes `stream` to `topic` on `channel` with one message in flight.
pub(crate) async fn open<S>(
    stream: S,
    index: usize,
    topic: &str,
    channel: &str,
    reports: UnboundedSender<ConnectionEvent>,
) -> Result<SharedWriter, ConnectorError>
where
    S: AsyncRead + AsyncWrite + Send + 'static,
{
    let (mut reader, writer) = tokio::io::split(stream);
    let writer: SharedWriter = Arc::new(Mutex::new(Box::new(writer)));

    write_bytes(&writer, MAGIC_V2)
        .await
        .map_err(|err| handshake_error(topic, err))?;
    send_command(&writer, Command::Sub { topic, channel })
        .await
        .map_err(|err| handshake_error(topic, err))?;

    loop {
        match read_frame(&mut reader)
            .await
            .map_err(|err| handshake_error(topic, err))?
        {
            Frame::Response(data) if data == OK => break,
            Frame::Response(data) if data == HEARTBEAT => {
                send_command(&writer, Command::Nop)
                    .await
                    .map_err(|err| handshake_error(topic, err))?;
            }
            Frame::Error(data) => {
                return Err(handshake_error(topic, String::from_utf8_lossy(&data)));
            }
            other => {
                return Err(handshake_error(
                    topic,
                    format!("unexpected frame {other:?}"),
                ));
            }
        }
    }

    send_command(&writer, Command::Rdy(1))
        .await
        .map_err(|err| handshake_error(topic, err))?;

    info!(
        event = events::CONNECTION_SUBSCRIBED,
        component = COMPONENT,
        topic,
        channel,
        connection = index,
        "subscribed on nsqd connection"
    );

    tokio::spawn(read_loop(reader, writer.clone(), index, reports));
    Ok(writer)
}

async fn read_loop<R>(
    mut reader: R,
    writer: SharedWriter,
    connection: usize,
    reports: UnboundedSender<ConnectionEvent>,
) where
    R: AsyncRead + Unpin,
{
    loop {
        match read_frame(&mut reader).await {
            Ok(Frame::Response(data)) if data == HEARTBEAT => {
                if let Err(err) = send_command(&writer, Command::Nop).await {
                    warn!(
                        event = events::CONNECTION_READ_FAILED,
                        component = COMPONENT,
                        connection,
                        err = %err,
                        "unable to answer heartbeat"
                    );
                    break;
                }
            }
            Ok(Frame::Response(data)) if data == CLOSE_WAIT => {
                debug!(
                    event = events::CONNECTION_CLOSED,
                    component = COMPONENT,
                    connection,
                    "nsqd acknowledged close"
                );
                break;
            }
            Ok(Frame::Response(data)) => {
                debug!(
                    component = COMPONENT,
                    connection,
                    response = %String::from_utf8_lossy(&data),
                    "ignoring nsqd response"
                );
            }
            // E_FIN_FAILED and friends leave the connection usable.
            Ok(Frame::Error(data)) => {
                warn!(
                    event = events::CONNECTION_ERROR_FRAME,
                    component = COMPONENT,
                    connection,
                    error = %String::from_utf8_lossy(&data),
                    "nsqd reported an error"
                );
            }
            Ok(Frame::Message(message)) => {
                let delivery = Delivery { connection, message };
                if reports.send(ConnectionEvent::Delivery(delivery)).is_err() {
                    break;
                }
            }
            Err(err) if err.kind() == io::ErrorKind::UnexpectedEof => {
                debug!(
                    event = events::CONNECTION_CLOSED,
                    component = COMPONENT,
                    connection,
                    "nsqd closed the connection"
                );
                break;
            }
            Err(err) => {
                warn!(
                    event = events::CONNECTION_READ_FAILED,
                    component = COMPONENT,
                    connection,
                    err = %err,
                    "nsqd connection failed"
                );
                break;
            }
        }
    }

    let _ = reports.send(ConnectionEvent::Closed { connection });
}
