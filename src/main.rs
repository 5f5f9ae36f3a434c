//! Merge Arena entry point
//!
//! Thin presentation shells around the simulation core: a canvas-backed
//! browser build and a headless native demo driver. Everything in this file
//! is replaceable; the contract is pointer events in, token snapshots out.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_shell {
    use std::cell::RefCell;
    use std::f64::consts::TAU;
    use std::rc::Rc;

    use glam::Vec2;
    use wasm_bindgen::prelude::*;
    use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, MouseEvent, TouchEvent};

    use merge_arena::consts::*;
    use merge_arena::sim::{MergePhase, PointerEvent, SimulationEngine, TokenId, TokenKind};

    struct Shell {
        engine: SimulationEngine,
        canvas: HtmlCanvasElement,
        context: CanvasRenderingContext2d,
    }

    impl Shell {
        fn new(engine: SimulationEngine, canvas: HtmlCanvasElement) -> Self {
            let context = canvas
                .get_context("2d")
                .expect("get 2d context")
                .expect("no 2d context")
                .dyn_into::<CanvasRenderingContext2d>()
                .expect("not a 2d context");
            Self {
                engine,
                canvas,
                context,
            }
        }

        /// Translate client coordinates to arena-local coordinates
        fn arena_pos(&self, client_x: f32, client_y: f32) -> Vec2 {
            let rect = self.canvas.get_bounding_client_rect();
            Vec2::new(client_x - rect.left() as f32, client_y - rect.top() as f32)
        }

        /// Topmost token under the pointer (last drawn wins)
        fn pick_token(&self, pos: Vec2) -> Option<TokenId> {
            self.engine
                .state()
                .tokens()
                .iter()
                .rev()
                .find(|t| t.pos.distance(pos) <= t.radius)
                .map(|t| t.id)
        }

        fn render(&self) {
            let ctx = &self.context;
            ctx.clear_rect(0.0, 0.0, ARENA_WIDTH as f64, ARENA_HEIGHT as f64);
            for token in self.engine.state().tokens() {
                ctx.begin_path();
                let _ = ctx.arc(
                    token.pos.x as f64,
                    token.pos.y as f64,
                    token.radius as f64,
                    0.0,
                    TAU,
                );
                ctx.set_global_alpha(if token.phase == MergePhase::Merging {
                    0.5
                } else {
                    1.0
                });
                ctx.set_fill_style_str(match token.kind {
                    TokenKind::Alpha => "blue",
                    TokenKind::Charlie => "red",
                });
                ctx.fill();
            }
            ctx.set_global_alpha(1.0);
        }
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Merge Arena starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");
        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .expect("no canvas")
            .dyn_into()
            .expect("not a canvas");
        canvas.set_width(ARENA_WIDTH as u32);
        canvas.set_height(ARENA_HEIGHT as u32);

        let seed = js_sys::Date::now() as u64;
        log::info!("Simulation seeded with {seed}");

        let shell = Rc::new(RefCell::new(Shell::new(
            SimulationEngine::new(seed),
            canvas.clone(),
        )));

        setup_input_handlers(&canvas, shell.clone());
        request_animation_frame(shell);

        log::info!("Merge Arena running!");
    }

    fn setup_input_handlers(canvas: &HtmlCanvasElement, shell: Rc<RefCell<Shell>>) {
        let window = web_sys::window().expect("no window");

        // Mouse down on the canvas grabs the token under the cursor
        {
            let shell = shell.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                let mut s = shell.borrow_mut();
                let pos = s.arena_pos(event.client_x() as f32, event.client_y() as f32);
                if let Some(target) = s.pick_token(pos) {
                    s.engine.handle_pointer(PointerEvent::Down { pos, target });
                }
            });
            let _ = canvas
                .add_event_listener_with_callback("mousedown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Move/up land on the window so drags survive leaving the canvas
        {
            let shell = shell.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                let mut s = shell.borrow_mut();
                let pos = s.arena_pos(event.client_x() as f32, event.client_y() as f32);
                s.engine.handle_pointer(PointerEvent::Move { pos });
            });
            let _ = window
                .add_event_listener_with_callback("mousemove", closure.as_ref().unchecked_ref());
            closure.forget();
        }
        {
            let shell = shell.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                shell.borrow_mut().engine.handle_pointer(PointerEvent::Up);
            });
            let _ = window
                .add_event_listener_with_callback("mouseup", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch events feed the same pointer abstraction
        {
            let shell = shell.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                if let Some(touch) = event.touches().get(0) {
                    let mut s = shell.borrow_mut();
                    let pos = s.arena_pos(touch.client_x() as f32, touch.client_y() as f32);
                    if let Some(target) = s.pick_token(pos) {
                        s.engine.handle_pointer(PointerEvent::Down { pos, target });
                    }
                }
            });
            let _ = canvas
                .add_event_listener_with_callback("touchstart", closure.as_ref().unchecked_ref());
            closure.forget();
        }
        {
            let shell = shell.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                if let Some(touch) = event.touches().get(0) {
                    let mut s = shell.borrow_mut();
                    let pos = s.arena_pos(touch.client_x() as f32, touch.client_y() as f32);
                    s.engine.handle_pointer(PointerEvent::Move { pos });
                }
            });
            let _ = canvas
                .add_event_listener_with_callback("touchmove", closure.as_ref().unchecked_ref());
            closure.forget();
        }
        {
            let shell = shell.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: TouchEvent| {
                shell.borrow_mut().engine.handle_pointer(PointerEvent::Up);
            });
            let _ = canvas
                .add_event_listener_with_callback("touchend", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn request_animation_frame(shell: Rc<RefCell<Shell>>) {
        let window = web_sys::window().expect("no window");
        let closure = Closure::once(move |time: f64| {
            frame(shell, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn frame(shell: Rc<RefCell<Shell>>, time: f64) {
        {
            let mut s = shell.borrow_mut();
            s.engine.tick(time as u64);
            s.render();
        }
        request_animation_frame(shell);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_shell::run();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

    use merge_arena::sim::{PointerEvent, SimulationEngine, TokenKind};

    env_logger::init();

    let seed = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0);
    log::info!("Merge Arena (native) starting with seed {seed}");

    let mut engine = SimulationEngine::new(seed);
    log::info!("{} tokens spawned", engine.state().len());

    // Scripted pointer session: grab the first Alpha, carry it onto the
    // first Charlie, hold until the merge completes.
    let grab = engine
        .state()
        .tokens()
        .iter()
        .find(|t| t.kind == TokenKind::Alpha)
        .map(|t| (t.id, t.pos));
    let target = engine
        .state()
        .tokens()
        .iter()
        .find(|t| t.kind == TokenKind::Charlie)
        .map(|t| t.pos);
    let (Some((held, start_pos)), Some(target_pos)) = (grab, target) else {
        log::error!("expected both token kinds at start");
        return;
    };

    engine.handle_pointer(PointerEvent::Down {
        pos: start_pos,
        target: held,
    });

    let start = Instant::now();
    loop {
        let now_ms = start.elapsed().as_millis() as u64;
        // Carry the token over the first second, then hold in place
        let t = (now_ms as f32 / 1000.0).min(1.0);
        engine.handle_pointer(PointerEvent::Move {
            pos: start_pos.lerp(target_pos, t),
        });
        engine.tick(now_ms);
        if now_ms >= 4000 {
            break;
        }
        std::thread::sleep(Duration::from_millis(16));
    }
    engine.handle_pointer(PointerEvent::Up);

    log::info!(
        "demo finished: {} tokens live, {} merges still pending",
        engine.state().len(),
        engine.pending_merges()
    );
    match serde_json::to_string_pretty(engine.state().tokens()) {
        Ok(snapshot) => println!("{snapshot}"),
        Err(err) => log::error!("snapshot serialization failed: {err}"),
    }
}
