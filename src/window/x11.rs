use anyhow::{anyhow, Result};
use tracing::instrument;
use xcb::{
    x::{Atom, GetProperty, InternAtom, Window, ATOM_ANY},
    Connection, Xid,
};

use super::ActiveWindowReader;

fn intern_atom(conn: &Connection, name: &[u8]) -> Result<Atom> {
    let reply = conn.wait_for_reply(conn.send_request(&InternAtom {
        only_if_exists: false,
        name,
    }))?;
    Ok(reply.atom())
}

/// Reads `_NET_ACTIVE_WINDOW` and its `_NET_WM_NAME` from the X server.
pub struct X11WindowReader {
    connection: Connection,
    root: Window,
    active_window_atom: Atom,
    window_name_atom: Atom,
}

impl X11WindowReader {
    pub fn new() -> Result<Self> {
        let (connection, preferred_screen) = Connection::connect(None)?;
        // Only the preferred screen is watched.
        let root = connection
            .get_setup()
            .roots()
            .nth(preferred_screen.max(0) as usize)
            .map(|screen| screen.root())
            .ok_or_else(|| anyhow!("X11 screen {preferred_screen} does not exist"))?;
        let active_window_atom = intern_atom(&connection, b"_NET_ACTIVE_WINDOW")?;
        let window_name_atom = intern_atom(&connection, b"_NET_WM_NAME")?;
        Ok(Self {
            connection,
            root,
            active_window_atom,
            window_name_atom,
        })
    }

    fn active_window(&self) -> Result<Option<Window>> {
        let reply = self.connection.wait_for_reply(self.connection.send_request(&GetProperty {
            delete: false,
            window: self.root,
            property: self.active_window_atom,
            r#type: ATOM_ANY,
            long_offset: 0,
            long_length: 1,
        }))?;
        Ok(reply
            .value::<Window>()
            .first()
            .copied()
            .filter(|window| window.resource_id() != 0))
    }

    fn window_name(&self, window: Window) -> Result<String> {
        let reply = self.connection.wait_for_reply(self.connection.send_request(&GetProperty {
            delete: false,
            window,
            property: self.window_name_atom,
            r#type: ATOM_ANY,
            long_offset: 0,
            long_length: 1024,
        }))?;
        Ok(String::from_utf8_lossy(reply.value::<u8>()).into_owned())
    }
}

impl ActiveWindowReader for X11WindowReader {
    #[instrument(skip(self))]
    fn active_window_title(&mut self) -> Result<String> {
        match self.active_window()? {
            Some(window) => self.window_name(window),
            // Nothing focused, the desktop itself is in front.
            None => Ok(String::new()),
        }
    }
}
