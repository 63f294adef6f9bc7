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

//! NSQ V2 wire format: length-prefixed frames from nsqd, line commands to it.

use std::io;
use tokio::io::{AsyncRead, AsyncReadExt};

/// Sent once after connecting to select protocol V2.
pub const MAGIC_V2: &[u8] = b"  V2";

pub const HEARTBEAT: &[u8] = b"_heartbeat_";
pub const OK: &[u8] = b"OK";
pub const CLOSE_WAIT: &[u8] = b"CLOSE_WAIT";

pub const FRAME_TYPE_RESPONSE: u32 = 0;
pub const FRAME_TYPE_ERROR: u32 = 1;
pub const FRAME_TYPE_MESSAGE: u32 = 2;

pub const MESSAGE_ID_LEN: usize = 16;
const MESSAGE_HEADER_LEN: usize = 8 + 2 + MESSAGE_ID_LEN;

// nsqd caps messages at 1 MiB by default; anything far beyond is a broken stream.
const MAX_FRAME_SIZE: usize = 64 * 1024 * 1024;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NsqMessage {
    /// Nanoseconds since the epoch at which nsqd accepted the message.
    pub timestamp: i64,
    pub attempts: u16,
    pub id: [u8; MESSAGE_ID_LEN],
    pub body: Vec<u8>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Frame {
    Response(Vec<u8>),
    Error(Vec<u8>),
    Message(NsqMessage),
}

/// Commands this client sends.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command<'a> {
    Sub { topic: &'a str, channel: &'a str },
    Rdy(u32),
    Fin(&'a [u8; MESSAGE_ID_LEN]),
    Nop,
    Cls,
}

impl Command<'_> {
    pub fn encode(&self) -> Vec<u8> {
        match self {
            Command::Sub { topic, channel } => format!("SUB {topic} {channel}\n").into_bytes(),
            Command::Rdy(count) => format!("RDY {count}\n").into_bytes(),
            Command::Fin(id) => {
                let mut line = Vec::with_capacity(4 + MESSAGE_ID_LEN + 1);
                line.extend_from_slice(b"FIN ");
                line.extend_from_slice(&id[..]);
                line.push(b'\n');
                line
            }
            Command::Nop => b"NOP\n".to_vec(),
            Command::Cls => b"CLS\n".to_vec(),
        }
    }
}

fn invalid_data(message: String) -> io::Error {
    io::Error::new(io::ErrorKind::InvalidData, message)
}

/// Reads one frame; an `UnexpectedEof` error means nsqd closed the connection.
pub async fn read_frame<R>(reader: &mut R) -> io::Result<Frame>
where
    R: AsyncRead + Unpin,
{
    let size = reader.read_u32().await? as usize;
    if !(4..=MAX_FRAME_SIZE).contains(&size) {
        return Err(invalid_data(format!("invalid frame size {size}")));
    }

    let frame_type = reader.read_u32().await?;
    let mut data = vec![0u8; size - 4];
    reader.read_exact(&mut data).await?;

    decode_frame(frame_type, data)
}

pub fn decode_frame(frame_type: u32, data: Vec<u8>) -> io::Result<Frame> {
    match frame_type {
        FRAME_TYPE_RESPONSE => Ok(Frame::Response(data)),
        FRAME_TYPE_ERROR => Ok(Frame::Error(data)),
        FRAME_TYPE_MESSAGE => decode_message(&data).map(Frame::Message),
        other => Err(invalid_data(format!("unknown frame type {other}"))),
    }
}

pub fn decode_message(data: &[u8]) -> io::Result<NsqMessage> {
    if data.len() < MESSAGE_HEADER_LEN {
        return Err(invalid_data(format!(
            "message frame too short: {} bytes",
            data.len()
        )));
    }

    let mut timestamp = [0u8; 8];
    timestamp.copy_from_slice(&data[0..8]);
    let mut attempts = [0u8; 2];
    attempts.copy_from_slice(&data[8..10]);
    let mut id = [0u8; MESSAGE_ID_LEN];
    id.copy_from_slice(&data[10..MESSAGE_HEADER_LEN]);

    Ok(NsqMessage {
        timestamp: i64::from_be_bytes(timestamp),
        attempts: u16::from_be_bytes(attempts),
        id,
        body: data[MESSAGE_HEADER_LEN..].to_vec(),
    })
}

/// Frame as nsqd writes it. Used by tests standing in for nsqd.
pub fn encode_frame(frame_type: u32, data: &[u8]) -> Vec<u8> {
    let mut frame = Vec::with_capacity(8 + data.len());
    frame.extend_from_slice(&((data.len() + 4) as u32).to_be_bytes());
    frame.extend_from_slice(&frame_type.to_be_bytes());
    frame.extend_from_slice(data);
    frame
}

pub fn encode_message(message: &NsqMessage) -> Vec<u8> {
    let mut data = Vec::with_capacity(MESSAGE_HEADER_LEN + message.body.len());
    data.extend_from_slice(&message.timestamp.to_be_bytes());
    data.extend_from_slice(&message.attempts.to_be_bytes());
    data.extend_from_slice(&message.id);
    data.extend_from_slice(&message.body);
    encode_frame(FRAME_TYPE_MESSAGE, &data)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn commands_encode_as_newline_terminated_lines() {
        assert_eq!(
            Command::Sub {
                topic: "faas-request",
                channel: "openfaas-channel"
            }
            .encode(),
            b"SUB faas-request openfaas-channel\n"
        );
        assert_eq!(Command::Rdy(1).encode(), b"RDY 1\n");
        assert_eq!(Command::Nop.encode(), b"NOP\n");
        assert_eq!(Command::Cls.encode(), b"CLS\n");

        let id = *b"0123456789abcdef";
        assert_eq!(Command::Fin(&id).encode(), b"FIN 0123456789abcdef\n");
    }

    #[tokio::test]
    async fn reads_response_and_error_frames() {
        let mut wire = encode_frame(FRAME_TYPE_RESPONSE, HEARTBEAT);
        wire.extend(encode_frame(FRAME_TYPE_ERROR, b"E_INVALID cannot SUB"));
        let mut reader = &wire[..];

        assert_eq!(
            read_frame(&mut reader).await.expect("response"),
            Frame::Response(HEARTBEAT.to_vec())
        );
        assert_eq!(
            read_frame(&mut reader).await.expect("error"),
            Frame::Error(b"E_INVALID cannot SUB".to_vec())
        );
        let eof = read_frame(&mut reader).await.unwrap_err();
        assert_eq!(eof.kind(), std::io::ErrorKind::UnexpectedEof);
    }

    #[tokio::test]
    async fn reads_message_frame_fields() {
        let message = NsqMessage {
            timestamp: 1_700_000_000_000_000_000,
            attempts: 3,
            id: *b"0a1b2c3d4e5f6a7b",
            body: br#"{"topic":"faas-request","value":"hi"}"#.to_vec(),
        };
        let wire = encode_message(&message);
        assert_eq!(&wire[0..4], &((26 + message.body.len() + 4) as u32).to_be_bytes());

        let mut reader = &wire[..];
        assert_eq!(
            read_frame(&mut reader).await.expect("message"),
            Frame::Message(message)
        );
    }

    #[test]
    fn short_message_and_unknown_type_are_rejected() {
        assert!(decode_message(&[0u8; 10]).is_err());
        assert!(decode_frame(7, Vec::new()).is_err());
    }

    #[tokio::test]
    async fn undersized_frame_length_is_rejected() {
        let wire = 2u32.to_be_bytes();
        let mut reader = &wire[..];
        let err = read_frame(&mut reader).await.unwrap_err();
        assert_eq!(err.kind(), std::io::ErrorKind::InvalidData);
    }
}
