//! Shared fixtures for the integration tests.

use roam_babel::load_json_str;
use roam_babel::model::Graph;

pub const CREATIVE_BRIEF: &str = include_str!("../fixtures/creative-brief.json");

pub fn creative_brief() -> Graph {
    load_json_str(CREATIVE_BRIEF).expect("fixture is a valid PageDump")
}
