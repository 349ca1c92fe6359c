//! Warehouse showcase viewer with iced UI.
//!
//! A side panel drives the drill-down navigation while the canvas viewport
//! shows the warehouse markers through the animated camera. Escape steps
//! back one level.

use iced::time::Instant;
use iced::widget::{Canvas, Column, Row, button, container, text};
use iced::{Element, Length, Point, Settings, Size, Subscription, Task, keyboard, mouse, window};

use warehouse_showcase::{NavigationLevel, Showcase, ShowcaseConfig, WarehouseCatalog};

mod viewport;

use viewport::WarehouseViewport;

/// Environment variable naming an optional JSON configuration file
const CONFIG_ENV: &str = "SHOWCASE_CONFIG";
const PANEL_WIDTH: f32 = 260.0;

/// Messages that the application can receive
#[derive(Debug, Clone)]
pub(crate) enum Message {
    SelectSection(String),
    OpenSubArea(String),
    CloseDetail,
    Back,
    Reset,
    Escape,
    Tick(Instant),
    ViewportClicked { position: Point, size: Size },
    ViewportHovered { position: Option<Point>, size: Size },
    OrbitPressed(mouse::Button),
    OrbitReleased(mouse::Button),
    OrbitDragged(f32, f32),
    Scrolled(f32),
}

/// Main application state
pub(crate) struct ShowcaseApp {
    showcase: Showcase,
    last_tick: Option<Instant>,
}

impl ShowcaseApp {
    pub(crate) fn new(config: ShowcaseConfig, catalog: WarehouseCatalog) -> Self {
        Self {
            showcase: Showcase::with_catalog(config, catalog),
            last_tick: None,
        }
    }

    pub(crate) fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::SelectSection(id) => {
                self.showcase.select_section(&id);
            }
            Message::OpenSubArea(id) => {
                self.showcase.open_sub_area(&id);
            }
            Message::CloseDetail => {
                self.showcase.close_detail();
            }
            Message::Back => {
                self.showcase.go_back();
            }
            Message::Reset => self.showcase.reset(),
            Message::Escape => {
                self.showcase.escape();
            }
            Message::Tick(now) => {
                let delta = self
                    .last_tick
                    .map_or(0.0, |last| now.duration_since(last).as_secs_f32());
                self.showcase.update(delta);
                self.last_tick = Some(now);
            }
            Message::ViewportClicked { position, size } => {
                self.showcase.resize(size);
                self.showcase.click_at(position, size);
            }
            Message::ViewportHovered { position, size } => {
                self.showcase.resize(size);
                self.showcase.hover_at(position, size);
            }
            Message::OrbitPressed(button) => {
                self.showcase.orbit_press(button);
            }
            Message::OrbitReleased(button) => {
                self.showcase.orbit_release(button);
            }
            Message::OrbitDragged(dx, dy) => {
                self.showcase.orbit_drag(dx, dy);
            }
            Message::Scrolled(delta) => {
                self.showcase.orbit_scroll(delta);
            }
        }

        // The frame subscription restarts with the next transition
        if !self.showcase.is_in_motion() {
            self.last_tick = None;
        }
        Task::none()
    }

    pub(crate) fn subscription(&self) -> Subscription<Message> {
        let escape = keyboard::on_key_press(|key, _modifiers| match key {
            keyboard::Key::Named(keyboard::key::Named::Escape) => Some(Message::Escape),
            _ => None,
        });

        if self.showcase.is_in_motion() {
            Subscription::batch([escape, window::frames().map(Message::Tick)])
        } else {
            escape
        }
    }

    pub(crate) fn view(&self) -> Element<Message> {
        let navigation = self.showcase.navigation();
        let catalog = self.showcase.catalog();

        let mut breadcrumb = String::from("Overview");
        if let Some(section) = navigation.current_section() {
            breadcrumb.push_str(" › ");
            breadcrumb.push_str(&section.data.name);
        }
        if let Some(sub_area) = navigation.current_sub_area() {
            breadcrumb.push_str(" › ");
            breadcrumb.push_str(&sub_area.data.name);
        }

        let mut panel = Column::new()
            .spacing(12)
            .push(text(catalog.name.clone()).size(24))
            .push(text(breadcrumb));

        match navigation.current_level() {
            NavigationLevel::Overview => {
                panel = panel.push(text("Sections"));
                for section in &catalog.sections {
                    panel = panel.push(nav_button(
                        &section.name,
                        Message::SelectSection(section.id.clone()),
                    ));
                }
            }
            NavigationLevel::Section => {
                if let Some(section) = navigation.current_section() {
                    panel = panel.push(text(section.data.description.clone()));
                    for sub_area in &section.data.sub_areas {
                        panel = panel.push(nav_button(
                            &sub_area.name,
                            Message::OpenSubArea(sub_area.id.clone()),
                        ));
                    }
                }
                let current = navigation.current_section().map(|s| s.id.as_str());
                panel = panel.push(text("Other sections"));
                for section in catalog
                    .sections
                    .iter()
                    .filter(|s| Some(s.id.as_str()) != current)
                {
                    panel = panel.push(nav_button(
                        &section.name,
                        Message::SelectSection(section.id.clone()),
                    ));
                }
            }
            NavigationLevel::Detail => {
                if let Some(sub_area) = navigation.current_sub_area() {
                    panel = panel
                        .push(text(sub_area.data.name.clone()).size(20))
                        .push(text(sub_area.data.description.clone()));
                }
                panel = panel.push(nav_button("Close", Message::CloseDetail));
            }
        }

        let controls = Row::new()
            .spacing(8)
            .push(
                button(text("Back"))
                    .on_press_maybe(navigation.can_go_back().then_some(Message::Back)),
            )
            .push(button(text("Reset")).on_press(Message::Reset));

        let camera = self.showcase.camera();
        let status = if camera.is_in_motion() {
            format!("Camera: moving {:.0}%", camera.progress() * 100.0)
        } else {
            let eye = camera.camera().eye;
            format!("Camera: ({:.1}, {:.1}, {:.1})", eye.x, eye.y, eye.z)
        };

        panel = panel.push(controls).push(text(status).size(12));

        let viewport = Canvas::new(WarehouseViewport::new(&self.showcase))
            .width(Length::Fill)
            .height(Length::Fill);

        Row::new()
            .spacing(10)
            .padding(10)
            .push(
                container(panel)
                    .width(Length::Fixed(PANEL_WIDTH))
                    .height(Length::Fill),
            )
            .push(viewport)
            .into()
    }
}

fn nav_button(label: &str, message: Message) -> Element<'static, Message> {
    button(text(label.to_string()))
        .width(Length::Fill)
        .on_press(message)
        .into()
}

fn load_config() -> Result<ShowcaseConfig, Box<dyn std::error::Error>> {
    match std::env::var(CONFIG_ENV) {
        Ok(path) => {
            log::info!("loading configuration from {}", path);
            let source = std::fs::read_to_string(&path)?;
            Ok(ShowcaseConfig::from_json(&source)?)
        }
        Err(_) => Ok(ShowcaseConfig::default()),
    }
}

/// Entry point for the warehouse showcase viewer
fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::builder().format_timestamp(None).init();

    let config = load_config()?;
    let catalog = WarehouseCatalog::embedded()?;
    log::info!(
        "loaded '{}' with {} sections",
        catalog.name,
        catalog.sections.len()
    );

    let app = ShowcaseApp::new(config, catalog);
    iced::application("Warehouse Showcase", ShowcaseApp::update, ShowcaseApp::view)
        .subscription(ShowcaseApp::subscription)
        .settings(Settings {
            antialiasing: true,
            ..Settings::default()
        })
        .run_with(move || (app, Task::none()))?;
    Ok(())
}
