//! Tasting note form for a wine in the cellar.

use tracing::{info, warn};

use crate::state::data::{Wine, WineType};
use crate::state::library::Library;

pub const SLIDER_MIN: f64 = 0.0;
pub const SLIDER_MAX: f64 = 100.0;

/// Outcome of the last write, shown under the form
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveStatus {
    Added,
    Updated,
    NotFound,
    Failed,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TastingNoteState {
    /// Cellar index of the wine being edited
    pub seq: i64,
    pub wine_name: String,
    pub wine_year: String,
    pub wine_price: String,
    pub wine_alcohol: String,
    pub wine_type: WineType,
    pub wine_sugar: f64,
    pub wine_body: f64,
    pub wine_tannin: f64,
    pub wine_ph: f64,
    pub wine_note: String,
    pub status: Option<SaveStatus>,
}

impl TastingNoteState {
    pub fn new(seq: i64) -> Self {
        Self {
            seq,
            wine_name: String::new(),
            wine_year: String::new(),
            wine_price: String::new(),
            wine_alcohol: String::new(),
            wine_type: WineType::Red,
            wine_sugar: SLIDER_MIN,
            wine_body: SLIDER_MIN,
            wine_tannin: SLIDER_MIN,
            wine_ph: SLIDER_MIN,
            wine_note: String::new(),
            status: None,
        }
    }

    /// Snapshot the form as a cellar record
    pub fn to_wine(&self) -> Wine {
        Wine {
            wine_index: self.seq,
            name: self.wine_name.clone(),
            year: self.wine_year.clone(),
            price: self.wine_price.clone(),
            alcohol: self.wine_alcohol.clone(),
            wine_type: self.wine_type,
            sugar: self.wine_sugar,
            body: self.wine_body,
            tannin: self.wine_tannin,
            ph: self.wine_ph,
            note: self.wine_note.clone(),
        }
    }

    fn fill_from(&mut self, wine: Wine) {
        self.seq = wine.wine_index;
        self.wine_name = wine.name;
        self.wine_year = wine.year;
        self.wine_price = wine.price;
        self.wine_alcohol = wine.alcohol;
        self.wine_type = wine.wine_type;
        self.wine_sugar = clamp_slider(wine.sugar);
        self.wine_body = clamp_slider(wine.body);
        self.wine_tannin = clamp_slider(wine.tannin);
        self.wine_ph = clamp_slider(wine.ph);
        self.wine_note = wine.note;
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum TastingNoteAction {
    WineNameChanged(String),
    WineYearChanged(String),
    WinePriceChanged(String),
    WineAlcoholChanged(String),
    WineTypeSelected(WineType),
    SugarChanged(f64),
    BodyChanged(f64),
    TanninChanged(f64),
    PhChanged(f64),
    NoteChanged(String),
    LoadNote(i64),
    UpdateCellar(Wine),
    AddCellar(Wine),
}

pub fn reduce(state: &mut TastingNoteState, action: TastingNoteAction, library: &Library) {
    match action {
        TastingNoteAction::WineNameChanged(value) => state.wine_name = value,
        TastingNoteAction::WineYearChanged(value) => state.wine_year = value,
        TastingNoteAction::WinePriceChanged(value) => state.wine_price = value,
        TastingNoteAction::WineAlcoholChanged(value) => state.wine_alcohol = value,
        TastingNoteAction::WineTypeSelected(wine_type) => state.wine_type = wine_type,
        TastingNoteAction::SugarChanged(value) => state.wine_sugar = clamp_slider(value),
        TastingNoteAction::BodyChanged(value) => state.wine_body = clamp_slider(value),
        TastingNoteAction::TanninChanged(value) => state.wine_tannin = clamp_slider(value),
        TastingNoteAction::PhChanged(value) => state.wine_ph = clamp_slider(value),
        TastingNoteAction::NoteChanged(value) => state.wine_note = value,

        TastingNoteAction::LoadNote(seq) => match library.get_wine(seq) {
            Ok(Some(wine)) => {
                state.fill_from(wine);
                state.status = None;
            }
            Ok(None) => warn!(seq, "no cellar entry to load"),
            Err(err) => warn!(seq, error = %err, "failed to load cellar entry"),
        },

        TastingNoteAction::UpdateCellar(wine) => {
            state.status = Some(match library.update_wine(&wine) {
                Ok(true) => {
                    info!(seq = wine.wine_index, "🍷 tasting note updated");
                    SaveStatus::Updated
                }
                Ok(false) => SaveStatus::NotFound,
                Err(err) => {
                    warn!(seq = wine.wine_index, error = %err, "failed to update tasting note");
                    SaveStatus::Failed
                }
            });
        }

        TastingNoteAction::AddCellar(wine) => match library.insert_wine(&wine) {
            Ok(()) => {
                info!(seq = wine.wine_index, "🍷 added to cellar");
                state.fill_from(wine);
                state.status = Some(SaveStatus::Added);
            }
            Err(err) => {
                warn!(seq = wine.wine_index, error = %err, "failed to add to cellar");
                state.status = Some(SaveStatus::Failed);
            }
        },
    }
}

pub fn clamp_slider(value: f64) -> f64 {
    if value.is_nan() {
        SLIDER_MIN
    } else {
        value.clamp(SLIDER_MIN, SLIDER_MAX)
    }
}

/// "Sugar: 42%" with the value truncated
pub fn slider_label(label: &str, value: f64) -> String {
    format!("{}: {}%", label, value as i64)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cellar_wine(index: i64) -> Wine {
        Wine {
            wine_index: index,
            name: "Chianti Classico".to_string(),
            year: "2019".to_string(),
            price: "32000".to_string(),
            alcohol: "13.5".to_string(),
            wine_type: WineType::Red,
            sugar: 5.0,
            body: 60.0,
            tannin: 55.0,
            ph: 30.0,
            note: String::new(),
        }
    }

    #[test]
    fn test_sliders_clamp() {
        let library = Library::open_in_memory().unwrap();
        let mut state = TastingNoteState::new(1);

        reduce(&mut state, TastingNoteAction::SugarChanged(140.0), &library);
        reduce(&mut state, TastingNoteAction::BodyChanged(-3.0), &library);
        reduce(&mut state, TastingNoteAction::PhChanged(f64::NAN), &library);
        reduce(&mut state, TastingNoteAction::TanninChanged(42.5), &library);

        assert_eq!(state.wine_sugar, 100.0);
        assert_eq!(state.wine_body, 0.0);
        assert_eq!(state.wine_ph, 0.0);
        assert_eq!(state.wine_tannin, 42.5);
    }

    #[test]
    fn test_slider_label_truncates() {
        assert_eq!(slider_label("Sugar", 42.9), "Sugar: 42%");
        assert_eq!(slider_label("pH", 100.0), "pH: 100%");
    }

    #[test]
    fn test_load_edit_update_round_trip() {
        let library = Library::open_in_memory().unwrap();
        library.insert_wine(&cellar_wine(8)).unwrap();

        let mut state = TastingNoteState::new(0);
        reduce(&mut state, TastingNoteAction::LoadNote(8), &library);
        assert_eq!(state.seq, 8);
        assert_eq!(state.wine_name, "Chianti Classico");
        assert_eq!(state.wine_body, 60.0);

        reduce(
            &mut state,
            TastingNoteAction::NoteChanged("Sour cherry, dried herbs".into()),
            &library,
        );
        reduce(
            &mut state,
            TastingNoteAction::WineTypeSelected(WineType::White),
            &library,
        );
        let wine = state.to_wine();
        reduce(&mut state, TastingNoteAction::UpdateCellar(wine.clone()), &library);

        assert_eq!(state.status, Some(SaveStatus::Updated));
        assert_eq!(library.get_wine(8).unwrap(), Some(wine));
    }

    #[test]
    fn test_load_missing_note_leaves_form() {
        let library = Library::open_in_memory().unwrap();
        let mut state = TastingNoteState::new(2);
        reduce(
            &mut state,
            TastingNoteAction::WineNameChanged("draft".into()),
            &library,
        );
        let before = state.clone();

        reduce(&mut state, TastingNoteAction::LoadNote(99), &library);
        assert_eq!(state, before);
    }

    #[test]
    fn test_update_unknown_wine_reports_not_found() {
        let library = Library::open_in_memory().unwrap();
        let mut state = TastingNoteState::new(3);

        reduce(
            &mut state,
            TastingNoteAction::UpdateCellar(cellar_wine(3)),
            &library,
        );
        assert_eq!(state.status, Some(SaveStatus::NotFound));
        assert!(library.all_wines().unwrap().is_empty());
    }

    #[test]
    fn test_add_cellar_loads_form_and_rejects_duplicates() {
        let library = Library::open_in_memory().unwrap();
        let mut state = TastingNoteState::new(0);

        reduce(&mut state, TastingNoteAction::AddCellar(cellar_wine(4)), &library);
        assert_eq!(state.status, Some(SaveStatus::Added));
        assert_eq!(state.seq, 4);
        assert_eq!(state.to_wine(), cellar_wine(4));

        reduce(&mut state, TastingNoteAction::AddCellar(cellar_wine(4)), &library);
        assert_eq!(state.status, Some(SaveStatus::Failed));
        assert_eq!(library.all_wines().unwrap().len(), 1);
    }
}
