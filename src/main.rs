use iced::widget::{
    button, column, container, row, scrollable, slider, text, text_input, Column, Row,
};
use iced::{Alignment, Element, Length, Task, Theme};
use std::sync::Arc;
use tracing::{info, warn};

mod config;
mod error;
mod feature;
mod logging;
mod net;
mod state;

use config::AppConfig;
use feature::effect::Environment;
use feature::product::{self, Effect, ProductAction, ProductBinding, ProductState};
use feature::tasting::{self, SaveStatus, TastingNoteAction, TastingNoteState};
use net::fetcher::ProductFetcher;
use net::users::StaticUserDirectory;
use state::data::{Wine, WineType};
use state::library::Library;

/// Region filter labels, in server index order
const REGION_LABELS: [&str; 4] = ["France", "Italy", "Spain", "New World"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Screen {
    Products,
    TastingNote,
}

/// Main application state
struct Vinoble {
    /// Wishlist and cellar catalog
    library: Library,
    /// Runs product effects off the UI thread
    env: Environment,
    products: ProductState,
    note: TastingNoteState,
    cellar: Vec<Wine>,
    screen: Screen,
    /// The wishlist sync runs once, after the first non-empty product response
    wishlist_synced: bool,
}

/// Application messages (events)
#[derive(Debug, Clone)]
enum Message {
    Product(ProductAction),
    Note(TastingNoteAction),
    /// A product effect completed
    EffectFinished(Option<ProductAction>),
    OpenNote(i64),
    /// Add the product at this list position to the cellar
    AddToCellar(usize),
    ShowProducts,
}

impl Vinoble {
    fn new(config: AppConfig, library: Library) -> (Self, Task<Message>) {
        let env = Environment::new(
            ProductFetcher::new(&config.base_url),
            Arc::new(StaticUserDirectory::new(config.known_users.clone())),
        );

        let mut app = Vinoble::with_env(library, env, &config.placeholder_user);
        let task = app.dispatch(ProductAction::FetchProducts);
        (app, task)
    }

    fn with_env(library: Library, env: Environment, placeholder_user: &str) -> Self {
        let mut app = Vinoble {
            library,
            env,
            products: ProductState::new(placeholder_user),
            note: TastingNoteState::new(0),
            cellar: Vec::new(),
            screen: Screen::Products,
            wishlist_synced: false,
        };
        app.refresh_cellar();
        app
    }

    /// Handle application messages and update state
    fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::Product(action) => self.dispatch(action),
            Message::EffectFinished(None) => Task::none(),
            Message::EffectFinished(Some(action)) => {
                let sync = !self.wishlist_synced
                    && matches!(&action, ProductAction::FetchResponse(p) if !p.is_empty());
                let task = self.dispatch(action);
                if sync {
                    self.wishlist_synced = true;
                    Task::batch([task, self.dispatch(ProductAction::SqliteWishList)])
                } else {
                    task
                }
            }
            Message::Note(action) => {
                let refresh = matches!(
                    action,
                    TastingNoteAction::UpdateCellar(_) | TastingNoteAction::AddCellar(_)
                );
                tasting::reduce(&mut self.note, action, &self.library);
                if refresh {
                    self.refresh_cellar();
                }
                Task::none()
            }
            Message::OpenNote(seq) => {
                tasting::reduce(&mut self.note, TastingNoteAction::LoadNote(seq), &self.library);
                self.screen = Screen::TastingNote;
                Task::none()
            }
            Message::AddToCellar(position) => {
                if let Some(product) = self.products.products.get(position) {
                    let wine = Wine::from_product(product);
                    let action = TastingNoteAction::AddCellar(wine);
                    tasting::reduce(&mut self.note, action, &self.library);
                    self.refresh_cellar();
                    self.screen = Screen::TastingNote;
                }
                Task::none()
            }
            Message::ShowProducts => self.dispatch(ProductAction::DismissPaging),
        }
    }

    /// Run the product reducer and turn its effect into an iced task
    fn dispatch(&mut self, action: ProductAction) -> Task<Message> {
        match product::reduce(&mut self.products, action, &self.library) {
            Effect::None => Task::none(),
            Effect::Dismiss => {
                self.screen = Screen::Products;
                Task::none()
            }
            effect => Task::perform(self.env.clone().run(effect), Message::EffectFinished),
        }
    }

    fn refresh_cellar(&mut self) {
        match self.library.all_wines() {
            Ok(wines) => self.cellar = wines,
            Err(err) => warn!(error = %err, "failed to read cellar"),
        }
    }

    /// Build the user interface
    fn view(&self) -> Element<Message> {
        let content = match self.screen {
            Screen::Products => self.products_view(),
            Screen::TastingNote => self.note_view(),
        };

        container(scrollable(content))
            .width(Length::Fill)
            .height(Length::Fill)
            .padding(20)
            .into()
    }

    fn products_view(&self) -> Element<Message> {
        let state = &self.products;

        let search: Row<Message> = row![
            text_input("Search wines", &state.search_product)
                .on_input(|s| bind(ProductBinding::SearchProduct(s)))
                .on_submit(Message::Product(ProductAction::SearchProductTapped))
                .padding(8),
            button("Search").on_press(Message::Product(ProductAction::SearchProductTapped)),
            button("Account").on_press(bind(ProductBinding::ShowDrawer(!state.show_drawer))),
        ]
        .spacing(10)
        .align_y(Alignment::Center);

        let types = choice_row(WineType::ALL.iter().map(|wine_type| {
            (
                wine_type.as_str(),
                state.selected_wine_type == wine_type.index(),
                Message::Product(ProductAction::WineTypeButtonTapped(wine_type.index())),
            )
        }));

        let regions = choice_row(REGION_LABELS.iter().enumerate().map(|(i, label)| {
            let region = i as i64;
            (
                *label,
                state.selected_region == region,
                Message::Product(ProductAction::WineRegionButtonTapped(region)),
            )
        }));

        let filters: Row<Message> = row![
            types,
            regions,
            button("Apply").on_press(Message::Product(ProductAction::FetchProducts)),
        ]
        .spacing(20);

        let listing: Element<Message> = if state.is_loading {
            text("Loading...").into()
        } else if state.products.is_empty() {
            text("No wines found.").into()
        } else {
            let rows = state.products.iter().enumerate().map(|(i, p)| {
                row![
                    text(p.display_name()).width(Length::Fill),
                    text(p.attribute("price").unwrap_or_default()).width(Length::Fixed(100.0)),
                    button(if state.is_liked(i) { "Liked" } else { "Like" })
                        .on_press(Message::Product(ProductAction::LikeButtonTapped(i))),
                    button("Add to cellar").on_press(Message::AddToCellar(i)),
                ]
                .spacing(10)
                .align_y(Alignment::Center)
                .into()
            });
            let rows: Column<Message> = Column::with_children(rows).spacing(6);
            rows.into()
        };

        let cellar: Column<Message> = Column::with_children(self.cellar.iter().map(|wine| {
            row![
                text(format!("{} ({}, {})", wine.name, wine.year, wine.wine_type))
                    .width(Length::Fill),
                button("Edit note").on_press(Message::OpenNote(wine.wine_index)),
            ]
            .spacing(10)
            .align_y(Alignment::Center)
            .into()
        }))
        .spacing(6);

        let mut page: Column<Message> = column![text("Vinoble").size(36), search, filters, listing]
            .spacing(16);

        if state.show_drawer {
            page = page.push(self.drawer_view());
        }

        page.push(text("My Cellar").size(24)).push(cellar).into()
    }

    fn drawer_view(&self) -> Element<Message> {
        let state = &self.products;
        let signed_in = if state.firebase_result {
            format!("Signed in as {}", state.user_email)
        } else {
            "Not signed in".to_string()
        };

        let drawer: Column<Message> = column![
            text_input("Email", &state.user_email)
                .on_input(|s| bind(ProductBinding::UserEmail(s)))
                .padding(8),
            text_input("Password", &state.user_password)
                .on_input(|s| bind(ProductBinding::UserPassword(s)))
                .secure(true)
                .padding(8),
            row![
                button("Sign in").on_press(Message::Product(ProductAction::FetchUserInfo)),
                button("Close").on_press(Message::Product(ProductAction::DismissPaging)),
            ]
            .spacing(10),
            text(signed_in).size(14),
        ]
        .spacing(10)
        .max_width(400.0);

        drawer.into()
    }

    fn note_view(&self) -> Element<Message> {
        let note = &self.note;

        let fields: Column<Message> = column![
            text_input("Wine Name", &note.wine_name)
                .on_input(|s| Message::Note(TastingNoteAction::WineNameChanged(s))),
            text_input("Wine Year", &note.wine_year)
                .on_input(|s| Message::Note(TastingNoteAction::WineYearChanged(s))),
            text_input("Wine Price", &note.wine_price)
                .on_input(|s| Message::Note(TastingNoteAction::WinePriceChanged(s))),
            text_input("Alcohol %", &note.wine_alcohol)
                .on_input(|s| Message::Note(TastingNoteAction::WineAlcoholChanged(s))),
            choice_row(WineType::ALL.iter().map(|wine_type| {
                (
                    wine_type.as_str(),
                    note.wine_type == *wine_type,
                    Message::Note(TastingNoteAction::WineTypeSelected(*wine_type)),
                )
            })),
        ]
        .spacing(12);

        let sliders: [(&str, f64, fn(f64) -> TastingNoteAction); 4] = [
            ("Sugar", note.wine_sugar, TastingNoteAction::SugarChanged),
            ("Body", note.wine_body, TastingNoteAction::BodyChanged),
            ("Tannin", note.wine_tannin, TastingNoteAction::TanninChanged),
            ("pH", note.wine_ph, TastingNoteAction::PhChanged),
        ];
        let sliders = sliders.into_iter().map(|(label, value, action)| {
            column![
                text(tasting::slider_label(label, value)).size(15),
                slider(tasting::SLIDER_MIN..=tasting::SLIDER_MAX, value, move |v| {
                    Message::Note(action(v))
                }),
            ]
            .spacing(4)
            .into()
        });
        let sliders: Column<Message> = Column::with_children(sliders).spacing(13);

        let status = match note.status {
            Some(SaveStatus::Added) => "Added to cellar.",
            Some(SaveStatus::Updated) => "Note updated.",
            Some(SaveStatus::NotFound) => "This wine is not in your cellar.",
            Some(SaveStatus::Failed) => "Could not save the note.",
            None => "",
        };

        let save = Message::Note(TastingNoteAction::UpdateCellar(note.to_wine()));
        let page: Column<Message> = column![
            text("Update Tasting Note").size(25),
            fields,
            sliders,
            text("Note:").size(15),
            text_input("Note", &note.wine_note)
                .on_input(|s| Message::Note(TastingNoteAction::NoteChanged(s))),
            row![
                button("Update Note").on_press(save),
                button("Back").on_press(Message::ShowProducts),
            ]
            .spacing(10),
            text(status).size(14),
        ]
        .spacing(20)
        .max_width(600.0);

        page.into()
    }

    /// Set the application theme
    fn theme(&self) -> Theme {
        Theme::Dark
    }
}

fn bind(binding: ProductBinding) -> Message {
    Message::Product(ProductAction::Binding(binding))
}

/// A row of buttons with the selected one highlighted
fn choice_row<'a>(
    choices: impl IntoIterator<Item = (&'a str, bool, Message)>,
) -> Row<'a, Message> {
    choices
        .into_iter()
        .fold(Row::new().spacing(8), |r, (label, selected, message)| {
            r.push(button(text(label)).style(choice_style(selected)).on_press(message))
        })
}

fn choice_style(selected: bool) -> fn(&Theme, button::Status) -> button::Style {
    if selected {
        button::primary
    } else {
        button::secondary
    }
}

fn main() -> anyhow::Result<()> {
    logging::init_tracing(logging::DEFAULT_FILTER)?;

    let config = AppConfig::from_env()?;
    let library = Library::open(&config.db_path)?;
    info!(base_url = %config.base_url, db = %library.path().display(), "🍷 Vinoble starting");

    iced::application("Vinoble", Vinoble::update, Vinoble::view)
        .theme(Vinoble::theme)
        .centered()
        .run_with(move || Vinoble::new(config, library))
        .map_err(|e| anyhow::anyhow!("ui failed: {}", e))
}
