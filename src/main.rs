//! Love Lock entry point
//!
//! Handles platform-specific initialization and runs the page loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_page {
    use std::cell::RefCell;
    use std::rc::Rc;

    use glam::Vec2;
    use wasm_bindgen::prelude::*;
    use web_sys::{
        Document, Element, EventTarget, HtmlElement, HtmlImageElement, KeyboardEvent, MouseEvent,
        PointerEvent, WheelEvent, Window,
    };

    use love_lock::audio::{AudioManager, SoundEffect};
    use love_lock::consts::*;
    use love_lock::renderer::CanvasRenderer;
    use love_lock::renderer::canvas::{SCRATCH_CANVAS, to_card_space};
    use love_lock::share::{letter_text, share_url};
    use love_lock::sim::scratch::brush_radius;
    use love_lock::sim::{
        AmbientDot, Cue, DialKey, Direction, Gesture, PointerId, SceneEvent, SceneState,
        TickInput, tick,
    };
    use love_lock::{
        Capabilities, PageConfig, Settings, Viewport, parallax_tilt, platform, reel_offset,
    };

    /// How long the share/copy buttons show their confirmation
    const COPIED_LABEL_MS: i32 = 1200;
    const COPIED_LABEL: &str = "Copied!";

    fn by_id<T: JsCast>(document: &Document, id: &str) -> Option<T> {
        document.get_element_by_id(id)?.dyn_into().ok()
    }

    /// Remove and re-add a class so its CSS animation replays
    fn restart_class(el: &HtmlElement, class: &str) {
        let list = el.class_list();
        let _ = list.remove_1(class);
        // Reading layout flushes the removal
        let _ = el.offset_width();
        let _ = list.add_1(class);
    }

    fn show(el: &HtmlElement) {
        el.set_hidden(false);
        restart_class(el, "show");
    }

    fn listen(target: &EventTarget, event: &str, handler: impl FnMut(web_sys::Event) + 'static) {
        let closure = Closure::<dyn FnMut(web_sys::Event)>::new(handler);
        let _ = target.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn current_viewport(window: &Window) -> Viewport {
        let w = window.inner_width().ok().and_then(|v| v.as_f64()).unwrap_or(1280.0);
        let h = window.inner_height().ok().and_then(|v| v.as_f64()).unwrap_or(720.0);
        Viewport::new(w as f32, h as f32, window.device_pixel_ratio() as f32)
    }

    /// One dial's elements
    struct DialDom {
        root: HtmlElement,
        digit: Option<Element>,
        /// Scrolling strip of 0-9 inside the dial window
        reel: Option<HtmlElement>,
    }

    /// Page elements, looked up once at startup
    struct Dom {
        dials: Vec<DialDom>,
        scene: Option<HtmlElement>,
        lock_card: Option<HtmlElement>,
        lock3d: Option<HtmlElement>,
        love_message: Option<HtmlElement>,
        love_overlay: Option<HtmlElement>,
        love_text: Option<HtmlElement>,
        letter: Option<HtmlElement>,
    }

    impl Dom {
        fn find(document: &Document) -> Self {
            let mut dials = Vec::new();
            if let Ok(nodes) = document.query_selector_all(".dial") {
                for i in 0..nodes.length() {
                    let Some(root) = nodes.get(i).and_then(|n| n.dyn_into::<HtmlElement>().ok())
                    else {
                        continue;
                    };
                    let digit = root.query_selector(".digit").ok().flatten();
                    let reel = root
                        .query_selector(".reel-track")
                        .ok()
                        .flatten()
                        .and_then(|el| el.dyn_into::<HtmlElement>().ok());
                    dials.push(DialDom { root, digit, reel });
                }
            }
            Self {
                dials,
                scene: by_id(document, "scene"),
                lock_card: by_id(document, "lockCard"),
                lock3d: by_id(document, "lock3d"),
                love_message: by_id(document, "loveMessage"),
                love_overlay: by_id(document, "loveOverlay"),
                love_text: by_id(document, "loveText"),
                letter: by_id(document, "letter"),
            }
        }

        fn set_digit(&self, dial: usize, value: u8) {
            let Some(d) = self.dials.get(dial) else {
                return;
            };
            if let Some(digit) = &d.digit {
                digit.set_text_content(Some(&value.to_string()));
                let _ = digit.set_attribute("data-value", &value.to_string());
            }
            if let Some(reel) = &d.reel {
                // One cell is the height of the dial window
                let cell = reel
                    .parent_element()
                    .and_then(|p| p.dyn_into::<HtmlElement>().ok())
                    .map_or(0.0, |p| p.offset_height() as f32);
                let _ = reel.style().set_property(
                    "transform",
                    &format!("translateY({}px)", reel_offset(value, cell)),
                );
            }
        }

        /// Lean the lock card toward the pointer
        fn tilt_card(&self, client_x: f32, client_y: f32) {
            let Some(card) = &self.lock_card else {
                return;
            };
            let rect = card.get_bounding_client_rect();
            let (rx, ry) = parallax_tilt(
                (
                    rect.left() as f32,
                    rect.top() as f32,
                    rect.width() as f32,
                    rect.height() as f32,
                ),
                client_x,
                client_y,
            );
            let _ = card
                .style()
                .set_property("transform", &format!("rotateX({rx:.2}deg) rotateY({ry:.2}deg)"));
        }

        fn reset_tilt(&self) {
            if let Some(card) = &self.lock_card {
                let _ = card
                    .style()
                    .set_property("transform", "rotateX(0deg) rotateY(0deg)");
            }
        }
    }

    /// Page instance holding all state
    struct Page {
        state: SceneState,
        renderer: CanvasRenderer,
        audio: AudioManager,
        dom: Dom,
        config: PageConfig,
        caps: Capabilities,
        accumulator: f64,
        last_time: f64,
        input: TickInput,
        /// Pointer and last card point of an in-progress scratch
        scratching: Option<(PointerId, Vec2)>,
        shown_text: String,
    }

    impl Page {
        fn new(
            state: SceneState,
            renderer: CanvasRenderer,
            dom: Dom,
            config: PageConfig,
            caps: Capabilities,
        ) -> Self {
            let mut audio = AudioManager::new();
            audio.set_master_volume(state.settings.master_volume);
            audio.set_muted(state.settings.muted || !caps.audio || !audio.is_available());
            Self {
                state,
                renderer,
                audio,
                dom,
                config,
                caps,
                accumulator: 0.0,
                last_time: 0.0,
                input: TickInput {
                    brush_radius: brush_radius(caps.coarse_pointer),
                    ..Default::default()
                },
                scratching: None,
                shown_text: String::new(),
            }
        }

        /// Run simulation ticks
        fn update(&mut self, dt_ms: f64) {
            self.accumulator += dt_ms.min(100.0);

            let mut substeps = 0;
            while self.accumulator >= SIM_DT_MS && substeps < MAX_SUBSTEPS {
                let input = self.input.clone();
                tick(&mut self.state, &input, SIM_DT_MS);
                self.accumulator -= SIM_DT_MS;
                substeps += 1;

                // Clear one-shot inputs after processing
                self.input.gestures.clear();
                self.input.scratches.clear();
            }
        }

        fn render(&mut self) {
            self.renderer.render(&self.state);

            let text = self.state.typewriter.visible_text();
            if text != self.shown_text {
                if let Some(el) = &self.dom.love_text {
                    el.set_text_content(Some(&text));
                }
                self.shown_text = text;
            }
        }

        fn resize(&mut self, viewport: Viewport) {
            self.state.resize(viewport);
            self.renderer.resize(&viewport);
            // Reel cells follow the dial window's new height
            self.render_digits();
        }

        fn render_digits(&self) {
            for (i, &value) in self.state.current_code().digits().iter().enumerate() {
                self.dom.set_digit(i, value);
            }
        }

        /// Map scene events to DOM, audio and haptics
        fn handle_events(&mut self) {
            for event in self.state.drain_events() {
                match event {
                    SceneEvent::DigitChanged { dial, value, .. } => {
                        self.dom.set_digit(dial, value);
                        if let Some(d) = self.dom.dials.get(dial) {
                            restart_class(&d.root, "bump");
                        }
                        self.audio.play(SoundEffect::Tick);
                    }
                    SceneEvent::DigitsReplaced => self.render_digits(),
                    SceneEvent::Shake => {
                        if let Some(card) = &self.dom.lock_card {
                            restart_class(card, "shake");
                        }
                    }
                    SceneEvent::HideMessage => {
                        if let Some(msg) = &self.dom.love_message {
                            let _ = msg.class_list().remove_1("show");
                            msg.set_hidden(true);
                        }
                    }
                    SceneEvent::Haptic(pattern) => {
                        if platform::haptics_enabled(&self.caps, self.state.settings.haptics) {
                            platform::vibrate(pattern.pattern());
                        }
                    }
                    SceneEvent::Unlocked => {
                        if let Some(card) = &self.dom.lock_card {
                            let _ = card.class_list().add_1("unlocked");
                        }
                    }
                    SceneEvent::CelebrationStarted => log::info!("Celebration started"),
                    SceneEvent::StageChanged(stage) => {
                        if let Some(scene) = &self.dom.scene {
                            let _ = scene.set_attribute("data-stage", &format!("{stage:?}"));
                        }
                    }
                    SceneEvent::Cue(cue) => self.run_cue(cue),
                    SceneEvent::MessageComplete => {
                        if let Some(el) = &self.dom.love_text {
                            let _ = el.class_list().add_1("done");
                        }
                    }
                    SceneEvent::LetterRevealed => {
                        if let Some(letter) = &self.dom.letter {
                            let _ = letter.class_list().add_1("revealed");
                        }
                    }
                }
            }
        }

        /// DOM side of the celebration cues; particle spawns already happened in the sim
        fn run_cue(&mut self, cue: Cue) {
            match cue {
                Cue::Chime => self.audio.play(SoundEffect::Chime),
                Cue::Shine => {
                    if let Some(el) = &self.dom.lock3d {
                        restart_class(el, "shine");
                    }
                }
                Cue::RevealMessage => {
                    if let Some(el) = &self.dom.love_message {
                        show(el);
                    }
                }
                Cue::SceneFadeOut => {
                    if let Some(el) = &self.dom.scene {
                        let _ = el.class_list().add_1("fade-out");
                    }
                }
                Cue::ShowOverlay => {
                    if let Some(el) = &self.dom.love_overlay {
                        show(el);
                    }
                }
                Cue::ScratchLetter => {
                    if let Some(el) = &self.dom.letter {
                        let _ = el.class_list().add_1("scratchable");
                    }
                    // Card size is only known once the letter is laid out
                    let viewport = self.state.viewport;
                    self.renderer.resize(&viewport);
                }
                _ => {}
            }
        }
    }

    pub async fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Love Lock starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        let mut settings = Settings::load();
        if platform::prefers_reduced_motion() {
            settings.reduced_motion = true;
        }
        let caps = platform::detect_capabilities();

        let search = window.location().search().unwrap_or_default();
        let config = PageConfig::from_query(&search, settings.target.len());
        apply_letter(&document, &config);

        let viewport = current_viewport(&window);
        let seed = js_sys::Date::now() as u64;
        let state = SceneState::new(settings, viewport, seed);
        log::info!("Scene initialized with seed: {}", seed);

        let mut renderer = CanvasRenderer::new(&document);
        renderer.resize(&viewport);

        let dom = Dom::find(&document);
        if dom.dials.len() != state.store.len() {
            log::warn!(
                "Page has {} dials for a {}-digit code",
                dom.dials.len(),
                state.store.len()
            );
        }

        let page = Rc::new(RefCell::new(Page::new(state, renderer, dom, config, caps)));

        {
            let mut p = page.borrow_mut();
            p.render_digits();
            if let Some(code) = p.config.code.clone() {
                match p.state.prefill(code) {
                    Ok(true) => log::info!("Unlocked from link"),
                    Ok(false) => {}
                    Err(e) => log::warn!("Ignoring prefill: {e}"),
                }
            }
            p.handle_events();
        }

        let dots = page.borrow_mut().state.ambient_backdrop();
        spawn_backdrop(&document, &dots);

        setup_dial_handlers(&page);
        setup_parallax(&page);
        setup_buttons(&document, &page);
        setup_scratch(&document, &page);
        setup_window(&window, &document, &page);

        // Start page loop
        request_animation_frame(page);

        log::info!("Love Lock running!");
    }

    fn apply_letter(document: &Document, config: &PageConfig) {
        if let Some(el) = document.get_element_by_id("letterSign") {
            el.set_text_content(Some(&config.sign));
        }
        if let Some(el) = document.get_element_by_id("letterCaption") {
            el.set_text_content(Some(&config.caption));
        }
        if let Some(img) = by_id::<HtmlImageElement>(document, "letterPhoto") {
            img.set_src(&config.photo);
        }
    }

    /// Fill `#bgParticles` with CSS-animated dots, unless the page already has some
    fn spawn_backdrop(document: &Document, dots: &[AmbientDot]) {
        let Some(layer) = document.get_element_by_id("bgParticles") else {
            return;
        };
        if layer.child_element_count() > 0 {
            return;
        }
        for dot in dots {
            let Ok(el) = document
                .create_element("div")
                .map_err(JsValue::from)
                .and_then(|el| el.dyn_into::<HtmlElement>().map_err(JsValue::from))
            else {
                continue;
            };
            el.set_class_name("particle");
            let style = el.style();
            let _ = style.set_property("left", &format!("{}vw", dot.left_vw));
            let _ = style.set_property("animation-delay", &format!("{:.2}s", dot.delay_s));
            let _ = style.set_property("animation-duration", &format!("{:.2}s", dot.duration_s));
            let _ = style.set_property("opacity", &format!("{:.2}", dot.opacity));
            let _ = layer.append_child(&el);
        }
        log::debug!("Spawned {} background dots", dots.len());
    }

    /// Mouse parallax on the lock card, off under reduced motion
    fn setup_parallax(page: &Rc<RefCell<Page>>) {
        let scene = {
            let p = page.borrow();
            if p.state.settings.reduced_motion {
                return;
            }
            p.dom.scene.clone()
        };
        let Some(scene) = scene else {
            return;
        };
        {
            let page = page.clone();
            listen(&scene, "mousemove", move |event| {
                if let Some(ev) = event.dyn_ref::<MouseEvent>() {
                    page.borrow()
                        .dom
                        .tilt_card(ev.client_x() as f32, ev.client_y() as f32);
                }
            });
        }
        {
            let page = page.clone();
            listen(&scene, "mouseleave", move |_event| {
                page.borrow().dom.reset_tilt();
            });
        }
    }

    fn push_gesture(page: &Rc<RefCell<Page>>, gesture: Gesture) {
        page.borrow_mut().input.gestures.push(gesture);
    }

    fn setup_dial_handlers(page: &Rc<RefCell<Page>>) {
        let dials: Vec<HtmlElement> = page
            .borrow()
            .dom
            .dials
            .iter()
            .map(|d| d.root.clone())
            .collect();

        for (dial, root) in dials.into_iter().enumerate() {
            // Up/down controls: tap vs hold, tracked per pointer
            for (selector, direction) in [(".up", Direction::Up), (".down", Direction::Down)] {
                let Some(control) = root.query_selector(selector).ok().flatten() else {
                    continue;
                };
                {
                    let page = page.clone();
                    let control_clone = control.clone();
                    listen(&control, "pointerdown", move |event| {
                        let Some(ev) = event.dyn_ref::<PointerEvent>() else {
                            return;
                        };
                        // Keep the dial's own drag from starting
                        ev.stop_propagation();
                        let _ = control_clone.set_pointer_capture(ev.pointer_id());
                        push_gesture(
                            &page,
                            Gesture::ControlPress {
                                dial,
                                direction,
                                pointer: ev.pointer_id(),
                            },
                        );
                    });
                }
                for name in ["pointerup", "pointerleave", "pointercancel"] {
                    let page = page.clone();
                    listen(&control, name, move |event| {
                        let Some(ev) = event.dyn_ref::<PointerEvent>() else {
                            return;
                        };
                        push_gesture(
                            &page,
                            Gesture::ControlRelease {
                                dial,
                                direction,
                                pointer: ev.pointer_id(),
                            },
                        );
                    });
                }
            }

            // Vertical drag
            {
                let page = page.clone();
                let root_clone = root.clone();
                listen(&root, "pointerdown", move |event| {
                    let Some(ev) = event.dyn_ref::<PointerEvent>() else {
                        return;
                    };
                    let _ = root_clone.set_pointer_capture(ev.pointer_id());
                    let _ = root_clone.class_list().add_1("active");
                    push_gesture(
                        &page,
                        Gesture::DragStart {
                            dial,
                            pointer: ev.pointer_id(),
                            y: ev.client_y() as f32,
                        },
                    );
                });
            }
            {
                let page = page.clone();
                listen(&root, "pointermove", move |event| {
                    let Some(ev) = event.dyn_ref::<PointerEvent>() else {
                        return;
                    };
                    push_gesture(
                        &page,
                        Gesture::DragMove {
                            dial,
                            pointer: ev.pointer_id(),
                            y: ev.client_y() as f32,
                        },
                    );
                });
            }
            for name in ["pointerup", "pointercancel"] {
                let page = page.clone();
                let root_clone = root.clone();
                listen(&root, name, move |event| {
                    let Some(ev) = event.dyn_ref::<PointerEvent>() else {
                        return;
                    };
                    let _ = root_clone.class_list().remove_1("active");
                    push_gesture(
                        &page,
                        Gesture::DragEnd {
                            dial,
                            pointer: ev.pointer_id(),
                        },
                    );
                });
            }

            // Click on the face: top half up, bottom half down
            {
                let page = page.clone();
                let root_clone = root.clone();
                listen(&root, "click", move |event| {
                    let Some(ev) = event.dyn_ref::<MouseEvent>() else {
                        return;
                    };
                    let on_control = ev
                        .target()
                        .and_then(|t| t.dyn_into::<Element>().ok())
                        .and_then(|el| el.closest(".up, .down").ok().flatten())
                        .is_some();
                    if on_control {
                        return;
                    }
                    // Clicks that end a turning drag are dropped by the input handler
                    let rect = root_clone.get_bounding_client_rect();
                    let height = rect.height().max(1.0) as f32;
                    let y_fraction = (ev.client_y() as f32 - rect.top() as f32) / height;
                    push_gesture(&page, Gesture::FaceTap { dial, y_fraction });
                });
            }

            // Wheel
            {
                let page = page.clone();
                listen(&root, "wheel", move |event| {
                    let Some(ev) = event.dyn_ref::<WheelEvent>() else {
                        return;
                    };
                    ev.prevent_default();
                    push_gesture(
                        &page,
                        Gesture::Wheel {
                            dial,
                            delta_y: ev.delta_y() as f32,
                        },
                    );
                });
            }

            // Keyboard
            {
                let page = page.clone();
                listen(&root, "keydown", move |event| {
                    let Some(ev) = event.dyn_ref::<KeyboardEvent>() else {
                        return;
                    };
                    if let Some(key) = DialKey::from_key(&ev.key()) {
                        ev.prevent_default();
                        push_gesture(&page, Gesture::Key { dial, key });
                    }
                });
            }
        }
    }

    /// Show a confirmation on `button`, then put `label` back
    fn flash_label(button: &HtmlElement, label: String) {
        button.set_text_content(Some(COPIED_LABEL));
        let button = button.clone();
        let restore = Closure::once_into_js(move || {
            button.set_text_content(Some(&label));
        });
        if let Some(window) = web_sys::window() {
            let _ = window.set_timeout_with_callback_and_timeout_and_arguments_0(
                restore.unchecked_ref(),
                COPIED_LABEL_MS,
            );
        }
    }

    fn copy_with_feedback(button: HtmlElement, label: String, text: String, clipboard_api: bool) {
        wasm_bindgen_futures::spawn_local(async move {
            if platform::copy_text(text, clipboard_api).await {
                flash_label(&button, label);
            } else {
                log::warn!("Copy failed");
            }
        });
    }

    fn setup_buttons(document: &Document, page: &Rc<RefCell<Page>>) {
        if let Some(btn) = by_id::<HtmlElement>(document, "shuffleBtn") {
            let page = page.clone();
            listen(&btn, "click", move |_event| {
                push_gesture(&page, Gesture::Shuffle);
            });
        }

        if let Some(btn) = by_id::<HtmlElement>(document, "shareBtn") {
            let page = page.clone();
            let label = btn.text_content().unwrap_or_default();
            let btn_clone = btn.clone();
            listen(&btn, "click", move |_event| {
                let href = web_sys::window()
                    .and_then(|w| w.location().href().ok())
                    .unwrap_or_default();
                let (url, clipboard_api) = {
                    let p = page.borrow();
                    (share_url(&href, p.state.current_code()), p.caps.clipboard)
                };
                copy_with_feedback(btn_clone.clone(), label.clone(), url, clipboard_api);
            });
        }

        if let Some(btn) = by_id::<HtmlElement>(document, "copyLetterBtn") {
            let page = page.clone();
            let label = btn.text_content().unwrap_or_default();
            let btn_clone = btn.clone();
            listen(&btn, "click", move |_event| {
                let (text, clipboard_api) = {
                    let p = page.borrow();
                    (letter_text(&p.config, p.state.typewriter.lines()), p.caps.clipboard)
                };
                copy_with_feedback(btn_clone.clone(), label.clone(), text, clipboard_api);
            });
        }
    }

    fn setup_scratch(document: &Document, page: &Rc<RefCell<Page>>) {
        let Some(canvas) = by_id::<HtmlElement>(document, SCRATCH_CANVAS) else {
            return;
        };

        {
            let page = page.clone();
            let canvas_clone = canvas.clone();
            listen(&canvas, "pointerdown", move |event| {
                let Some(ev) = event.dyn_ref::<PointerEvent>() else {
                    return;
                };
                let mut p = page.borrow_mut();
                let Some(rect) = p.renderer.scratch_rect() else {
                    return;
                };
                let Some(point) = to_card_space(rect, ev.client_x() as f32, ev.client_y() as f32)
                else {
                    return;
                };
                let _ = canvas_clone.set_pointer_capture(ev.pointer_id());
                p.state.scratch.set_aspect(rect.2, rect.3);
                p.scratching = Some((ev.pointer_id(), point));
                p.input.scratches.push((point, point));
            });
        }
        {
            let page = page.clone();
            listen(&canvas, "pointermove", move |event| {
                let Some(ev) = event.dyn_ref::<PointerEvent>() else {
                    return;
                };
                let mut p = page.borrow_mut();
                let Some((pointer, last)) = p.scratching else {
                    return;
                };
                if pointer != ev.pointer_id() {
                    return;
                }
                let Some(rect) = p.renderer.scratch_rect() else {
                    return;
                };
                if let Some(point) =
                    to_card_space(rect, ev.client_x() as f32, ev.client_y() as f32)
                {
                    p.input.scratches.push((last, point));
                    p.scratching = Some((pointer, point));
                }
            });
        }
        for name in ["pointerup", "pointercancel", "pointerleave"] {
            let page = page.clone();
            listen(&canvas, name, move |event| {
                let Some(ev) = event.dyn_ref::<PointerEvent>() else {
                    return;
                };
                let mut p = page.borrow_mut();
                if matches!(p.scratching, Some((pointer, _)) if pointer == ev.pointer_id()) {
                    p.scratching = None;
                }
            });
        }
    }

    fn setup_window(window: &Window, document: &Document, page: &Rc<RefCell<Page>>) {
        // Browsers only start audio after a user gesture
        {
            let page = page.clone();
            listen(document, "pointerdown", move |_event| {
                page.borrow().audio.resume();
            });
        }

        {
            let page = page.clone();
            listen(window, "resize", move |_event| {
                let Some(window) = web_sys::window() else {
                    return;
                };
                let viewport = current_viewport(&window);
                page.borrow_mut().resize(viewport);
            });
        }
    }

    fn request_animation_frame(page: Rc<RefCell<Page>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |time: f64| {
            page_loop(page, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn page_loop(page: Rc<RefCell<Page>>, time: f64) {
        {
            let mut p = page.borrow_mut();

            // Calculate delta time
            let dt = if p.last_time > 0.0 {
                time - p.last_time
            } else {
                SIM_DT_MS
            };
            p.last_time = time;

            p.update(dt);
            p.handle_events();
            p.render();
        }

        request_animation_frame(page);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    wasm_page::run().await;
}

/// Headless session: `love-lock [QUERY]`
#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use love_lock::consts::SIM_DT_MS;
    use love_lock::share::{letter_text, share_url};
    use love_lock::sim::{SceneEvent, SceneState, TickInput, tick};
    use love_lock::{PageConfig, Settings, Viewport};

    /// Simulated seconds after the unlock
    const SESSION_SECS: f64 = 12.0;
    const SEED: u64 = 201_146;

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Love Lock (native) starting...");

    let query = std::env::args().nth(1).unwrap_or_default();
    let settings = Settings::load();
    let config = PageConfig::from_query(&query, settings.target.len());
    let mut state = SceneState::new(settings, Viewport::default(), SEED);

    let Some(code) = config.code.clone() else {
        log::warn!(
            "No {}-digit code in {:?}; the lock stays closed",
            state.store.len(),
            query
        );
        return;
    };
    match state.prefill(code) {
        Ok(true) => log::info!("Unlocked"),
        Ok(false) => log::info!("Wrong code {}", state.current_code()),
        Err(e) => log::warn!("Ignoring code: {e}"),
    }

    let input = TickInput::default();
    let ticks = (SESSION_SECS * 1000.0 / SIM_DT_MS) as u64;
    for _ in 0..ticks {
        tick(&mut state, &input, SIM_DT_MS);
        for event in state.drain_events() {
            match event {
                SceneEvent::StageChanged(_) | SceneEvent::Cue(_) => {}
                other => log::info!("{:.0} ms: {:?}", state.now_ms, other),
            }
        }
    }

    log::info!(
        "After {:.1} s: stage {:?} (all cues fired: {}), confetti {}, hearts {}, fx {}, bursts {}",
        state.timeline.elapsed(state.now_ms).unwrap_or(0.0) / 1000.0,
        state.stage(),
        state.timeline.is_finished(),
        state.confetti.len(),
        state.hearts.len(),
        state.fx.len(),
        state.fx.bursts()
    );
    println!("{}", state.typewriter.visible_text());
    println!();
    println!("{}", share_url("https://example.com/", state.current_code()));
    if state.is_unlocked() {
        println!();
        println!("{}", letter_text(&config, state.typewriter.lines()));
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
