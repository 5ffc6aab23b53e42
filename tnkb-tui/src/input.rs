use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::app::{App, Screen};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Action {
    None,
    Quit,
    /// Run `service.check_plate`(...) for the current input
    CheckPlate,
}

pub(crate) fn handle_key_event(key: KeyEvent, app: &mut App) -> Action {
    use KeyCode::{Backspace, Char, Down, Enter, Esc, Tab, Up};

    // Global quit shortcut; plain `q` is a valid plate letter
    if key.code == Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        return Action::Quit;
    }

    let mut action = Action::None;

    match app.screen {
        Screen::PlateCheck => match key.code {
            Up => {
                if app.result_index > 0 {
                    app.result_index -= 1;
                }
            }
            Down => {
                if app.result_index + 1 < app.results.len() {
                    app.result_index += 1;
                }
            }
            Char(character) => {
                if !key.modifiers.contains(KeyModifiers::CONTROL)
                    && !key.modifiers.contains(KeyModifiers::ALT)
                {
                    app.plate_input.push(character);
                }
            }
            Backspace => {
                app.plate_input.pop();
            }
            Enter => {
                action = Action::CheckPlate;
            }
            Tab => app.toggle_screen(),
            Esc => {
                action = Action::Quit;
            }
            _ => {}
        },

        Screen::RegionList => match key.code {
            Up | Char('k') => {
                if app.region_index > 0 {
                    app.region_index -= 1;
                }
            }
            Down | Char('j') => {
                if app.region_index + 1 < app.regions.len() {
                    app.region_index += 1;
                }
            }
            Tab | Esc | Char('b') => app.toggle_screen(),
            Char('q') => {
                action = Action::Quit;
            }
            _ => {}
        },
    }
    action
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use tnkb_core::service::TnkbService;

    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn app() -> App {
        App::new(Arc::new(TnkbService::offline()), true)
    }

    #[test]
    fn typing_collects_plate_input() {
        let mut app = app();
        for character in "b1234q".chars() {
            assert_eq!(handle_key_event(key(KeyCode::Char(character)), &mut app), Action::None);
        }
        assert_eq!(app.plate_input, "b1234q");

        handle_key_event(key(KeyCode::Backspace), &mut app);
        assert_eq!(app.plate_input, "b1234");
        assert_eq!(handle_key_event(key(KeyCode::Enter), &mut app), Action::CheckPlate);
    }

    #[test]
    fn tab_switches_to_region_list_and_back() {
        let mut app = app();
        handle_key_event(key(KeyCode::Tab), &mut app);
        assert_eq!(app.screen, Screen::RegionList);

        handle_key_event(key(KeyCode::Down), &mut app);
        handle_key_event(key(KeyCode::Char('j')), &mut app);
        assert_eq!(app.region_index, 2);
        handle_key_event(key(KeyCode::Up), &mut app);
        assert_eq!(app.region_index, 1);

        handle_key_event(key(KeyCode::Esc), &mut app);
        assert_eq!(app.screen, Screen::PlateCheck);
    }

    #[test]
    fn quit_shortcuts() {
        let mut app = app();
        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(handle_key_event(ctrl_c, &mut app), Action::Quit);
        assert_eq!(handle_key_event(key(KeyCode::Esc), &mut app), Action::Quit);

        app.toggle_screen();
        assert_eq!(handle_key_event(key(KeyCode::Char('q')), &mut app), Action::Quit);
    }
}
