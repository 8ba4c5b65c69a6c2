//! Mock connection and listener shared by the integration tests

#![allow(dead_code)]

use ethttp::network::error::Error;
use ethttp::network::{Close, Connection, Listener, Read, Write};
use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

/// What the server did to a connection, observable after it was closed.
#[derive(Debug, Default)]
pub struct Wire {
    pub written: Vec<u8>,
    pub flushes: usize,
    pub closed: bool,
}

impl Wire {
    pub fn text(&self) -> &str {
        core::str::from_utf8(&self.written).unwrap()
    }
}

pub type Probe = Rc<RefCell<Wire>>;

/// Mock connection serving a fixed request
#[derive(Debug)]
pub struct MockConnection {
    data: Vec<u8>,
    read_pos: usize,
    fail_reads_at: Option<usize>,
    fail_writes: bool,
    wire: Probe,
}

impl MockConnection {
    /// Create a connection with `data` waiting to be read
    pub fn new(data: &[u8]) -> (Self, Probe) {
        let wire = Probe::default();
        let conn = Self {
            data: data.to_vec(),
            read_pos: 0,
            fail_reads_at: None,
            fail_writes: false,
            wire: wire.clone(),
        };
        (conn, wire)
    }

    /// Make `read_byte` fail once `pos` bytes were read
    pub fn failing_reads_at(mut self, pos: usize) -> Self {
        self.fail_reads_at = Some(pos);
        self
    }

    /// Make every `write_byte` fail
    pub fn failing_writes(mut self) -> Self {
        self.fail_writes = true;
        self
    }
}

impl Read for MockConnection {
    type Error = Error;

    fn available(&self) -> usize {
        self.data.len() - self.read_pos
    }

    fn read_byte(&mut self) -> Result<u8, Self::Error> {
        if self.fail_reads_at == Some(self.read_pos) {
            return Err(Error::ReadError);
        }
        let byte = *self.data.get(self.read_pos).ok_or(Error::ConnectionClosed)?;
        self.read_pos += 1;
        Ok(byte)
    }
}

impl Write for MockConnection {
    type Error = Error;

    fn write_byte(&mut self, byte: u8) -> Result<(), Self::Error> {
        if self.fail_writes {
            return Err(Error::WriteError);
        }
        self.wire.borrow_mut().written.push(byte);
        Ok(())
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        self.wire.borrow_mut().flushes += 1;
        Ok(())
    }
}

impl Close for MockConnection {
    type Error = Error;

    fn close(self) -> Result<(), Self::Error> {
        self.wire.borrow_mut().closed = true;
        Ok(())
    }
}

impl Connection for MockConnection {}

/// Mock listener handing out queued connections
#[derive(Debug, Default)]
pub struct MockListener {
    pending: VecDeque<MockConnection>,
    pub missing_hardware: bool,
    pub fail_accept: bool,
    pub accepts: usize,
}

impl MockListener {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a client sending `data`
    pub fn connect(&mut self, data: &[u8]) -> Probe {
        let (conn, wire) = MockConnection::new(data);
        self.pending.push_back(conn);
        wire
    }

    pub fn push(&mut self, conn: MockConnection) {
        self.pending.push_back(conn);
    }

    pub fn pending(&self) -> usize {
        self.pending.len()
    }
}

impl Listener for MockListener {
    type Connection = MockConnection;
    type Error = Error;

    fn accept(&mut self) -> Result<Option<Self::Connection>, Self::Error> {
        if self.fail_accept {
            return Err(Error::NotOpen);
        }
        let conn = self.pending.pop_front();
        if conn.is_some() {
            self.accepts += 1;
        }
        Ok(conn)
    }

    fn hardware_present(&self) -> bool {
        !self.missing_hardware
    }
}
