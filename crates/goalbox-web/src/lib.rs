pub mod runner;
pub mod settings;

pub use runner::GameRunner;
pub use settings::DebugSettings;

/// Generate all `#[wasm_bindgen]` exports for a game.
///
/// Generates:
/// - `thread_local!` storage for the GameRunner
/// - `try_with_runner()` helper; before `game_init()` every export is a
///   no-op and every accessor answers a zero default
/// - All wasm-bindgen exports (game_init, game_tick, input handlers,
///   resize, data accessors, score and debug-mode accessors)
///
/// # Usage
///
/// ```ignore
/// use wasm_bindgen::prelude::*;
/// use goalbox_engine::*;
///
/// mod game;
/// use game::MyGame;
///
/// goalbox_web::export_game!(MyGame, "my-game");
/// ```
///
/// # Arguments
///
/// - `$game_type`: The game struct type that implements `goalbox_engine::Game`
///   and has a `new()` constructor
/// - `$game_name`: A string literal used in the initialization log message
#[macro_export]
macro_rules! export_game {
    ($game_type:ty, $game_name:literal) => {
        use std::cell::RefCell;

        thread_local! {
            static RUNNER: RefCell<Option<$crate::GameRunner<$game_type>>> = RefCell::new(None);
        }

        fn try_with_runner<R>(f: impl FnOnce(&mut $crate::GameRunner<$game_type>) -> R) -> Option<R> {
            RUNNER.with(|cell| cell.borrow_mut().as_mut().map(f))
        }

        #[wasm_bindgen]
        pub fn game_init() {
            console_error_panic_hook::set_once();
            let _ = console_log::init_with_level(log::Level::Info);

            let game = <$game_type>::new();
            let runner = $crate::GameRunner::new(game);

            RUNNER.with(|cell| {
                *cell.borrow_mut() = Some(runner);
            });

            try_with_runner(|r| r.init());
            log::info!("{}: initialized", $game_name);
        }

        #[wasm_bindgen]
        pub fn game_tick(dt: f32) {
            try_with_runner(|r| r.tick(dt));
        }

        #[wasm_bindgen]
        pub fn game_pointer_down(x: f32, y: f32) {
            try_with_runner(|r| r.push_input(InputEvent::PointerDown { x, y }));
        }

        #[wasm_bindgen]
        pub fn game_pointer_up(x: f32, y: f32) {
            try_with_runner(|r| r.push_input(InputEvent::PointerUp { x, y }));
        }

        #[wasm_bindgen]
        pub fn game_pointer_move(x: f32, y: f32) {
            try_with_runner(|r| r.push_input(InputEvent::PointerMove { x, y }));
        }

        #[wasm_bindgen]
        pub fn game_key_down(key_code: u32) {
            try_with_runner(|r| r.push_input(InputEvent::KeyDown { key_code }));
        }

        #[wasm_bindgen]
        pub fn game_key_up(key_code: u32) {
            try_with_runner(|r| r.push_input(InputEvent::KeyUp { key_code }));
        }

        #[wasm_bindgen]
        pub fn game_custom_event(kind: u32, a: f32, b: f32, c: f32) {
            try_with_runner(|r| r.push_input(InputEvent::Custom { kind, a, b, c }));
        }

        #[wasm_bindgen]
        pub fn game_resize(width: f32, height: f32) {
            try_with_runner(|r| r.resize(width, height));
        }

        #[wasm_bindgen]
        pub fn game_load_config(json: &str) {
            try_with_runner(|r| r.load_config(json));
        }

        // ---- Data accessors ----

        #[wasm_bindgen]
        pub fn get_header_ptr() -> *const f32 {
            try_with_runner(|r| r.header_ptr()).unwrap_or(std::ptr::null())
        }

        #[wasm_bindgen]
        pub fn get_snapshots_ptr() -> *const f32 {
            try_with_runner(|r| r.snapshots_ptr()).unwrap_or(std::ptr::null())
        }

        #[wasm_bindgen]
        pub fn get_body_count() -> u32 {
            try_with_runner(|r| r.body_count()).unwrap_or_default()
        }

        #[wasm_bindgen]
        pub fn get_debug_segments_ptr() -> *const f32 {
            try_with_runner(|r| r.debug_segments_ptr()).unwrap_or(std::ptr::null())
        }

        #[wasm_bindgen]
        pub fn get_debug_segment_count() -> u32 {
            try_with_runner(|r| r.debug_segment_count()).unwrap_or_default()
        }

        #[wasm_bindgen]
        pub fn get_game_events_ptr() -> *const f32 {
            try_with_runner(|r| r.game_events_ptr()).unwrap_or(std::ptr::null())
        }

        #[wasm_bindgen]
        pub fn get_game_events_len() -> u32 {
            try_with_runner(|r| r.game_events_len()).unwrap_or_default()
        }

        #[wasm_bindgen]
        pub fn get_world_width() -> f32 {
            try_with_runner(|r| r.world_width()).unwrap_or_default()
        }

        #[wasm_bindgen]
        pub fn get_world_height() -> f32 {
            try_with_runner(|r| r.world_height()).unwrap_or_default()
        }

        // ---- Score and settings ----

        #[wasm_bindgen]
        pub fn get_score() -> u32 {
            try_with_runner(|r| r.scoreboard().score).unwrap_or_default()
        }

        #[wasm_bindgen]
        pub fn get_attempts() -> u32 {
            try_with_runner(|r| r.scoreboard().attempts).unwrap_or_default()
        }

        #[wasm_bindgen]
        pub fn get_is_over() -> bool {
            try_with_runner(|r| r.scoreboard().is_over).unwrap_or_default()
        }

        #[wasm_bindgen]
        pub fn get_debug_mode() -> bool {
            try_with_runner(|r| r.debug_mode()).unwrap_or_default()
        }

        #[wasm_bindgen]
        pub fn set_debug_mode(on: bool) {
            try_with_runner(|r| r.set_debug_mode(on));
        }

        // ---- Capacity accessors ----

        #[wasm_bindgen]
        pub fn get_max_bodies() -> u32 {
            try_with_runner(|r| r.max_bodies()).unwrap_or_default()
        }

        #[wasm_bindgen]
        pub fn get_max_debug_segments() -> u32 {
            try_with_runner(|r| r.max_debug_segments()).unwrap_or_default()
        }

        #[wasm_bindgen]
        pub fn get_max_events() -> u32 {
            try_with_runner(|r| r.max_events()).unwrap_or_default()
        }

        #[wasm_bindgen]
        pub fn get_buffer_total_floats() -> u32 {
            try_with_runner(|r| r.buffer_total_floats()).unwrap_or_default()
        }
    };
}
