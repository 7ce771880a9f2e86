//! Product browsing: filters, search, product list and the wishlist cache.
//!
//! [`reduce`] mutates [`ProductState`] synchronously and returns an [`Effect`]
//! describing any async work. The wishlist table is read and written inline.

use std::collections::BTreeMap;
use tracing::{debug, info, warn};

use crate::config::DEFAULT_PLACEHOLDER_USER;
use crate::state::data::{Product, WishlistEntry};
use crate::state::library::Library;

/// Everything the product screen shows or remembers
#[derive(Debug, Clone, PartialEq)]
pub struct ProductState {
    pub search_product: String,
    /// 0 = red, 1 = white
    pub selected_wine_type: i64,
    pub selected_region: i64,
    pub is_text_field_focused: bool,

    // Products
    pub products: Vec<Product>,
    pub is_loading: bool,
    pub min_index: i64,

    // Drawer
    pub show_drawer: bool,
    pub user_email: String,
    pub user_password: String,
    pub firebase_result: bool,
    /// Identifier a fresh install starts with; seeding keys off it
    pub placeholder_user: String,

    // Wishlist
    pub wishlist: Vec<WishlistEntry>,
    /// Product position -> 1 (liked) / 0
    pub like_state: BTreeMap<usize, i64>,

    // Drag
    pub offset: (f32, f32),
    pub is_drag: bool,
}

impl ProductState {
    pub fn new(placeholder_user: &str) -> Self {
        Self {
            search_product: String::new(),
            selected_wine_type: 0,
            selected_region: 0,
            is_text_field_focused: false,
            products: Vec::new(),
            is_loading: true,
            min_index: 0,
            show_drawer: false,
            user_email: placeholder_user.to_string(),
            user_password: placeholder_user.to_string(),
            firebase_result: false,
            placeholder_user: placeholder_user.to_string(),
            wishlist: Vec::new(),
            like_state: BTreeMap::new(),
            offset: (0.0, 0.0),
            is_drag: false,
        }
    }

    pub fn is_liked(&self, position: usize) -> bool {
        self.like_state.get(&position) == Some(&1)
    }
}

impl Default for ProductState {
    fn default() -> Self {
        Self::new(DEFAULT_PLACEHOLDER_USER)
    }
}

/// Two-way bindings from view controls
#[derive(Debug, Clone, PartialEq)]
pub enum ProductBinding {
    SearchProduct(String),
    TextFieldFocused(bool),
    ShowDrawer(bool),
    UserEmail(String),
    UserPassword(String),
    DragChanged { width: f32, height: f32 },
    DragEnded,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ProductAction {
    Binding(ProductBinding),
    FetchProducts,
    FetchResponse(Vec<Product>),
    WineTypeButtonTapped(i64),
    WineRegionButtonTapped(i64),
    SearchProductTapped,
    FetchUserInfo,
    FetchResponseUserInfo(String),
    DismissPaging,
    /// Product position in the current list
    LikeButtonTapped(usize),
    SqliteWishList,
}

/// Async work requested by the reducer. Completion comes back as an action.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    None,
    FetchListing { region: i64, wine_type: i64 },
    Search { query: String },
    CheckUser { user_id: String },
    Dismiss,
}

pub fn reduce(state: &mut ProductState, action: ProductAction, library: &Library) -> Effect {
    match action {
        ProductAction::Binding(binding) => {
            apply_binding(state, binding);
            Effect::None
        }

        ProductAction::FetchProducts => {
            debug!(user = %state.user_email, "fetching products");
            Effect::FetchListing {
                region: state.selected_region,
                wine_type: state.selected_wine_type,
            }
        }

        ProductAction::FetchResponse(products) => {
            if let Some(first) = products.first() {
                state.min_index = first.index;
            }
            state.products = products;
            state.is_loading = false;
            Effect::None
        }

        ProductAction::SearchProductTapped => Effect::Search {
            query: state.search_product.clone(),
        },

        ProductAction::WineTypeButtonTapped(wine_type) => {
            state.selected_wine_type = wine_type;
            Effect::None
        }

        ProductAction::WineRegionButtonTapped(region) => {
            state.selected_region = region;
            Effect::None
        }

        ProductAction::FetchUserInfo => Effect::CheckUser {
            user_id: state.user_email.clone(),
        },

        ProductAction::FetchResponseUserInfo(user_email) => {
            state.user_email = user_email;
            state.firebase_result = true;
            Effect::None
        }

        ProductAction::DismissPaging => {
            state.show_drawer = false;
            Effect::Dismiss
        }

        ProductAction::LikeButtonTapped(position) => {
            toggle_like(state, position, library);
            Effect::None
        }

        ProductAction::SqliteWishList => {
            sync_wishlist(state, library);
            Effect::None
        }
    }
}

fn apply_binding(state: &mut ProductState, binding: ProductBinding) {
    match binding {
        ProductBinding::SearchProduct(text) => state.search_product = text,
        ProductBinding::TextFieldFocused(focused) => state.is_text_field_focused = focused,
        ProductBinding::ShowDrawer(show) => state.show_drawer = show,
        ProductBinding::UserEmail(email) => state.user_email = email,
        ProductBinding::UserPassword(password) => state.user_password = password,
        ProductBinding::DragChanged { width, height } => {
            state.offset = (width, height);
            state.is_drag = true;
        }
        ProductBinding::DragEnded => {
            state.offset = (0.0, 0.0);
            state.is_drag = false;
        }
    }
}

/// Flip the cached flag for `position` and write it to row `position + 1`.
/// Only the in-memory map is consulted; the stored value is never read.
fn toggle_like(state: &mut ProductState, position: usize, library: &Library) {
    let liked = match state.like_state.get(&position) {
        Some(1) => 0,
        _ => 1,
    };

    let row_id = position as i64 + 1;
    if let Err(err) = library.update(liked, row_id) {
        warn!(row_id, error = %err, "failed to persist wishlist flag");
    }
    state.like_state.insert(position, liked);
}

/// Load wishlist rows, seed them on a first run, then flip every cached flag.
///
/// The final flip runs unconditionally, so a fresh seed ends up all liked.
fn sync_wishlist(state: &mut ProductState, library: &Library) {
    state.wishlist = match library.query_all() {
        Ok(rows) => rows,
        Err(err) => {
            warn!(error = %err, "failed to read wishlist");
            Vec::new()
        }
    };

    if state.wishlist.is_empty() && state.user_email == state.placeholder_user {
        info!(count = state.products.len(), "seeding wishlist");
        for position in 0..state.products.len() {
            if let Err(err) = library.insert(0) {
                warn!(position, error = %err, "failed to seed wishlist row");
            }
            state.like_state.insert(position, 0);
        }
    }

    for position in 0..state.products.len() {
        let flag = state.like_state.entry(position).or_insert(0);
        *flag = if *flag == 1 { 0 } else { 1 };
    }
}
