//! Windows notification-area host built on `tray-icon`.
#![allow(unsafe_code)]

use std::time::Duration;

use crossbeam_channel::{Receiver, RecvTimeoutError};
use tracing::debug;
use tray_icon::menu::{IsMenuItem, Menu, MenuEvent, MenuItem, PredefinedMenuItem};
use tray_icon::{Icon, MouseButton, MouseButtonState, TrayIconBuilder, TrayIconEvent};
use windows_sys::Win32::UI::WindowsAndMessaging::{
    DispatchMessageW, PeekMessageW, TranslateMessage, MSG, PM_REMOVE,
};

use crate::error::{Result, TrayError};
use crate::host::{EventSink, TrayEvent, TrayHost, TrayUpdate};
use crate::icon::TrayIconImage;
use crate::menu::{MenuEntry, TrayMenuItem, MENU_LAYOUT};
use crate::state::TrayState;

/// Frame of the icon loop: how long to wait for an update between pumps
const POLL_INTERVAL: Duration = Duration::from_millis(16);

pub struct NativeTrayHost;

impl TrayHost for NativeTrayHost {
    fn run(
        &self,
        icon: TrayIconImage,
        state: TrayState,
        updates: Receiver<TrayUpdate>,
        events: EventSink,
        on_ready: &dyn Fn(),
    ) -> Result<()> {
        let icon = Icon::from_rgba(icon.rgba, icon.width, icon.height)
            .map_err(|e| TrayError::Icon(e.to_string()))?;

        let items: Vec<(TrayMenuItem, MenuItem)> = MENU_LAYOUT
            .iter()
            .filter_map(|entry| match entry {
                MenuEntry::Item(item) => Some((
                    *item,
                    MenuItem::with_id(item.id(), item.label(&state), true, None),
                )),
                MenuEntry::Separator => None,
            })
            .collect();
        let separator = PredefinedMenuItem::separator();

        let mut rows: Vec<&dyn IsMenuItem> = Vec::with_capacity(MENU_LAYOUT.len());
        let mut next_item = items.iter();
        for entry in MENU_LAYOUT {
            match entry {
                MenuEntry::Item(_) => {
                    if let Some((_, native)) = next_item.next() {
                        rows.push(native);
                    }
                }
                MenuEntry::Separator => rows.push(&separator),
            }
        }

        let menu = Menu::new();
        menu.append_items(&rows)
            .map_err(|e| TrayError::Native(e.to_string()))?;

        let tray = TrayIconBuilder::new()
            .with_menu(Box::new(menu))
            .with_menu_on_left_click(false)
            .with_tooltip(&state.tooltip)
            .with_icon(icon)
            .build()
            .map_err(|e| TrayError::Native(e.to_string()))?;
        on_ready();

        let play_pause = items
            .iter()
            .find(|(item, _)| *item == TrayMenuItem::PlayPause)
            .map(|(_, native)| native);

        let menu_events = MenuEvent::receiver();
        let icon_events = TrayIconEvent::receiver();

        loop {
            pump_messages();

            while let Ok(event) = menu_events.try_recv() {
                if let Some(item) = TrayMenuItem::from_id(event.id.0.as_str()) {
                    events(TrayEvent::Menu(item));
                }
            }
            while let Ok(event) = icon_events.try_recv() {
                if let TrayIconEvent::Click {
                    button: MouseButton::Left,
                    button_state: MouseButtonState::Up,
                    ..
                } = event
                {
                    events(TrayEvent::Activated);
                }
            }

            match updates.recv_timeout(POLL_INTERVAL) {
                Ok(TrayUpdate::State(state)) => {
                    if let Err(e) = tray.set_tooltip(Some(&state.tooltip)) {
                        debug!(error = %e, "Failed to set tray tooltip");
                    }
                    if let Some(native) = play_pause {
                        native.set_text(TrayMenuItem::PlayPause.label(&state));
                    }
                }
                Ok(TrayUpdate::Shutdown) | Err(RecvTimeoutError::Disconnected) => break,
                Err(RecvTimeoutError::Timeout) => {}
            }
        }

        // Removes the icon from the notification area
        drop(tray);
        pump_messages();
        Ok(())
    }
}

fn pump_messages() {
    // SAFETY: MSG is plain data that PeekMessageW fills before it is read, and
    // a null window handle selects every window owned by this thread.
    unsafe {
        let mut msg: MSG = std::mem::zeroed();
        while PeekMessageW(&mut msg, std::ptr::null_mut(), 0, 0, PM_REMOVE) != 0 {
            TranslateMessage(&msg);
            DispatchMessageW(&msg);
        }
    }
}
