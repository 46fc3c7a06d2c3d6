//! Built-in checkers.

pub mod underef;

use crate::lint::Registry;

pub(crate) fn register_all(r: &mut Registry) {
    r.register(&underef::INFO, underef::Underef::construct);
}
