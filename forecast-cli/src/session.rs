use std::fmt;

use forecast_core::ViewController;
use inquire::{InquireError, Select, Text};

/// Entries of the interactive menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuItem {
    EditLocation,
    GetPrediction,
    Clear,
    DismissNotification,
    Quit,
}

impl MenuItem {
    /// Menu for the current screen; dismissing only makes sense while a
    /// notification is up.
    pub fn available(notification_visible: bool) -> Vec<MenuItem> {
        let mut items = vec![MenuItem::EditLocation, MenuItem::GetPrediction, MenuItem::Clear];
        if notification_visible {
            items.push(MenuItem::DismissNotification);
        }
        items.push(MenuItem::Quit);
        items
    }
}

impl fmt::Display for MenuItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            MenuItem::EditLocation => "Enter location",
            MenuItem::GetPrediction => "Get weather prediction",
            MenuItem::Clear => "Clear",
            MenuItem::DismissNotification => "Dismiss notification",
            MenuItem::Quit => "Quit",
        })
    }
}

pub struct Session {
    controller: ViewController,
}

impl Session {
    pub fn new(controller: ViewController) -> Self {
        Self { controller }
    }

    pub async fn run(mut self) -> anyhow::Result<()> {
        loop {
            self.controller.drain_ready();
            println!("\n{}", self.controller.render());

            let items = MenuItem::available(self.controller.render().notification.is_some());
            let choice = match Select::new("What next?", items).prompt() {
                Ok(choice) => choice,
                Err(e) if is_cancel(&e) => break,
                Err(e) => return Err(e.into()),
            };

            match choice {
                MenuItem::EditLocation => {
                    let text = Text::new("Enter Location")
                        .with_initial_value(&self.controller.state().entered_text)
                        .prompt();
                    match text {
                        Ok(text) => self.controller.on_text_change(text),
                        Err(e) if is_cancel(&e) => continue,
                        Err(e) => return Err(e.into()),
                    }
                }
                MenuItem::GetPrediction => {
                    self.controller.on_submit();
                    if self.controller.in_flight() > 0 {
                        println!("Fetching prediction...");
                    }
                    self.controller.settle().await;
                }
                MenuItem::Clear => self.controller.on_clear(),
                MenuItem::DismissNotification => self.controller.on_dismiss_notification(),
                MenuItem::Quit => break,
            }
        }

        Ok(())
    }
}

fn is_cancel(err: &InquireError) -> bool {
    matches!(
        err,
        InquireError::OperationCanceled | InquireError::OperationInterrupted
    )
}
