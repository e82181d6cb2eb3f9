use anyhow::{bail, Result};
use windows::Win32::UI::WindowsAndMessaging::{GetForegroundWindow, GetWindowTextW};

use super::ActiveWindowReader;

const TITLE_CAPACITY: usize = 1024;

/// Reads the title of the foreground window through the Win32 API.
pub struct WindowsWindowReader;

impl ActiveWindowReader for WindowsWindowReader {
    fn active_window_title(&mut self) -> Result<String> {
        let window = unsafe { GetForegroundWindow() };
        if window.is_invalid() {
            bail!("Failed to get foreground window");
        }
        let mut text = [0u16; TITLE_CAPACITY];
        let len = unsafe { GetWindowTextW(window, &mut text) };
        Ok(String::from_utf16_lossy(&text[..len.max(0) as usize]))
    }
}
