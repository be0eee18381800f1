use wasm_bindgen::prelude::*;
use goalbox_engine::InputEvent;

mod game;
mod input;
mod shapes;

use game::GoalBoxGame;

goalbox_web::export_game!(GoalBoxGame, "goal-box");
