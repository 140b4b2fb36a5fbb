//! Blocking request/reply link to the viewport process.
//!
//! This process binds and the viewport peer dials in, mirroring the bound
//! request socket of the wire protocol. Frames are newline-delimited UTF-8
//! JSON; every request blocks until the peer replies, so a slow or absent
//! peer stalls the simulation loop.

use std::io::{BufRead, BufReader, Write};
use std::net::{SocketAddr, TcpListener, TcpStream};

use tracing::{debug, info};

use crate::error::{Result, ViewportError};
use crate::pose::Pose;

/// Sentinel request asking the peer for the initial pose.
pub const INITIAL_POSE_REQUEST: &str = "Initial";

/// Default bind address for the link.
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:5556";

struct Peer {
    reader: BufReader<TcpStream>,
    writer: TcpStream,
}

/// Request/reply link bound by the simulation process.
pub struct ViewportLink {
    listener: TcpListener,
    peer: Option<Peer>,
}

impl ViewportLink {
    /// Bind the link. The peer is accepted lazily on the first request.
    pub fn bind(addr: &str) -> Result<Self> {
        let listener = TcpListener::bind(addr)?;
        info!(addr, "viewport link bound");
        Ok(Self {
            listener,
            peer: None,
        })
    }

    /// The local address the link is bound to.
    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    /// Ask the peer for the initial `[position, quaternion]` pose.
    pub fn request_initial_pose(&mut self) -> Result<Pose> {
        info!("waiting for initial pose from viewport");
        let reply = self.request(INITIAL_POSE_REQUEST)?;
        let pose: Pose = serde_json::from_str(&reply)?;
        debug!(?pose, "received initial pose");
        Ok(pose)
    }

    /// Stream one pose frame to the peer and wait for its acknowledgment.
    pub fn send_pose(&mut self, pose: &Pose) -> Result<()> {
        let frame = serde_json::to_string(pose)?;
        self.request(&frame)?;
        Ok(())
    }

    /// Send one frame and block for the reply line.
    fn request(&mut self, frame: &str) -> Result<String> {
        let peer = self.peer()?;
        peer.writer.write_all(frame.as_bytes())?;
        peer.writer.write_all(b"\n")?;
        peer.writer.flush()?;

        let mut reply = String::new();
        if peer.reader.read_line(&mut reply)? == 0 {
            return Err(ViewportError::Disconnected);
        }
        Ok(reply.trim_end().to_string())
    }

    fn peer(&mut self) -> Result<&mut Peer> {
        if self.peer.is_none() {
            let (stream, addr) = self.listener.accept()?;
            info!(%addr, "viewport peer connected");
            let writer = stream.try_clone()?;
            self.peer = Some(Peer {
                reader: BufReader::new(stream),
                writer,
            });
        }
        Ok(self.peer.as_mut().expect("peer just accepted"))
    }
}
