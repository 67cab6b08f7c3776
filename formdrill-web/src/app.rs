//! Main application component binding UI events to the session engine.
//!
//! The component owns one [`SessionEngine`] for the life of the page, renders
//! HUD text from an engine snapshot, and forwards every shape selection to
//! the external renderer through [`crate::shape_bridge`].

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use formdrill_core::{
    MAX_TICK_SECONDS, PracticeMode, SessionConfig, SessionEngine, ShapeCatalog, TierSelector,
    format_clock, format_short_duration,
};
use gloo::timers::callback::Interval;
use web_sys::{HtmlInputElement, HtmlSelectElement};
use yew::prelude::*;

use crate::components::button::Button;
use crate::shape_bridge;
use crate::storage::BrowserStore;

type Engine = SessionEngine<BrowserStore>;

const DURATION_CHOICES: &[f64] = &[15.0, 30.0, 60.0, 120.0, 300.0];
const AUTO_SWITCH_CHOICES: &[f64] = &[0.0, 10.0, 15.0, 30.0, 60.0];
const TICK_INTERVAL_MS: u32 = 50;

/// Render model snapshotted from the engine after every event and tick.
#[derive(Clone, PartialEq, Default)]
struct HudModel {
    shape_name: String,
    clock: String,
    mode_line: String,
    next_in: String,
    session_rounds: u32,
    session_streak: u32,
    total_rounds: u32,
    total_time: String,
    best_streak: u32,
    avg_round: String,
    mistake_count: usize,
    running: bool,
    duration_seconds: f64,
    auto_switch_seconds: f64,
    tier_value: String,
    mode_value: String,
    keep_angle: bool,
    notice: Option<String>,
}

fn mode_line(config: &SessionConfig) -> String {
    let mut line = format!("{} practice on {} shapes", config.mode, config.tier);
    if config.keep_angle {
        line.push_str(" (same shape, new angle)");
    }
    line
}

fn tier_value(tier: TierSelector) -> String {
    match tier {
        TierSelector::Mixed => "mixed".to_string(),
        TierSelector::Tier(t) => t.to_string(),
    }
}

fn mode_value(mode: PracticeMode) -> &'static str {
    match mode {
        PracticeMode::Normal => "normal",
        PracticeMode::RepeatMistakes => "repeat-mistakes",
    }
}

fn snapshot(engine: &mut Engine, prev_notice: Option<String>) -> HudModel {
    let notice = engine
        .take_notices()
        .into_iter()
        .last()
        .map(|n| n.to_string())
        .or(prev_notice);
    let config = engine.config().clone();
    let stats = *engine.stats();
    let counters = *engine.counters();
    let avg_round = if stats.total_rounds > 0 {
        format_short_duration(stats.total_time / f64::from(stats.total_rounds))
    } else {
        "0s".to_string()
    };
    HudModel {
        shape_name: engine.selection().shape.name.to_string(),
        clock: format_clock(engine.remaining_seconds()),
        mode_line: mode_line(&config),
        next_in: if config.auto_switch_seconds > 0.0 {
            format_short_duration(config.auto_switch_seconds)
        } else {
            "Off".to_string()
        },
        session_rounds: counters.session_rounds,
        session_streak: counters.session_streak,
        total_rounds: stats.total_rounds,
        total_time: format_short_duration(stats.total_time),
        best_streak: stats.best_streak,
        avg_round,
        mistake_count: engine.mistake_count(),
        running: engine.is_running(),
        duration_seconds: config.duration_seconds,
        auto_switch_seconds: config.auto_switch_seconds,
        tier_value: tier_value(config.tier),
        mode_value: mode_value(config.mode).to_string(),
        keep_angle: config.keep_angle,
        notice,
    }
}

fn resync(engine: &Rc<RefCell<Engine>>, hud: &UseStateHandle<HudModel>) {
    let prev = hud.notice.clone();
    hud.set(snapshot(&mut engine.borrow_mut(), prev));
}

#[allow(clippy::too_many_lines, clippy::cast_possible_truncation, clippy::cast_sign_loss)]
#[function_component(App)]
pub fn app() -> Html {
    let engine = use_mut_ref(|| {
        let seed = js_sys::Date::now() as u64;
        SessionEngine::new(BrowserStore, SessionConfig::default(), seed)
    });
    let hud = use_state_eq(|| snapshot(&mut engine.borrow_mut(), None));
    let max_tier = ShapeCatalog::builtin().max_tier();

    // Clamped animation tick; the engine assumes one crossing per call.
    {
        let engine = engine.clone();
        let hud = hud.clone();
        use_effect_with((), move |_| {
            shape_bridge::emit(engine.borrow().selection());
            let last = Cell::new(js_sys::Date::now());
            let interval = Interval::new(TICK_INTERVAL_MS, move || {
                let now = js_sys::Date::now();
                let delta = ((now - last.get()) / 1000.0).min(MAX_TICK_SECONDS);
                last.set(now);
                let mut engine_ref = engine.borrow_mut();
                if let Some(selection) = engine_ref.tick(delta) {
                    shape_bridge::emit(&selection);
                }
                let prev = hud.notice.clone();
                hud.set(snapshot(&mut engine_ref, prev));
            });
            move || drop(interval)
        });
    }

    let on_start = {
        let engine = engine.clone();
        let hud = hud.clone();
        Callback::from(move |_: MouseEvent| {
            engine.borrow_mut().start();
            resync(&engine, &hud);
        })
    };
    let on_pause = {
        let engine = engine.clone();
        let hud = hud.clone();
        Callback::from(move |_: MouseEvent| {
            engine.borrow_mut().pause();
            resync(&engine, &hud);
        })
    };
    let on_next = {
        let engine = engine.clone();
        let hud = hud.clone();
        Callback::from(move |_: MouseEvent| {
            let selection = engine.borrow_mut().skip();
            shape_bridge::emit(&selection);
            resync(&engine, &hud);
        })
    };
    let on_mark = {
        let engine = engine.clone();
        let hud = hud.clone();
        Callback::from(move |_: MouseEvent| {
            engine.borrow_mut().mark_mistake();
            resync(&engine, &hud);
        })
    };
    let on_clear = {
        let engine = engine.clone();
        let hud = hud.clone();
        Callback::from(move |_: MouseEvent| {
            engine.borrow_mut().clear_mistakes();
            resync(&engine, &hud);
        })
    };
    let on_reset = {
        let engine = engine.clone();
        let hud = hud.clone();
        Callback::from(move |_: MouseEvent| {
            engine.borrow_mut().reset_stats();
            resync(&engine, &hud);
        })
    };

    let on_duration = {
        let engine = engine.clone();
        let hud = hud.clone();
        Callback::from(move |e: Event| {
            let Some(select) = e.target_dyn_into::<HtmlSelectElement>() else {
                return;
            };
            let Ok(seconds) = select.value().parse::<f64>() else {
                return;
            };
            let mut config = engine.borrow().config().clone();
            config.duration_seconds = seconds;
            engine.borrow_mut().apply_config(config);
            resync(&engine, &hud);
        })
    };
    let on_auto_switch = {
        let engine = engine.clone();
        let hud = hud.clone();
        Callback::from(move |e: Event| {
            let Some(select) = e.target_dyn_into::<HtmlSelectElement>() else {
                return;
            };
            let Ok(seconds) = select.value().parse::<f64>() else {
                return;
            };
            let mut config = engine.borrow().config().clone();
            config.auto_switch_seconds = seconds;
            engine.borrow_mut().apply_config(config);
            resync(&engine, &hud);
        })
    };
    let on_tier = {
        let engine = engine.clone();
        let hud = hud.clone();
        Callback::from(move |e: Event| {
            let Some(select) = e.target_dyn_into::<HtmlSelectElement>() else {
                return;
            };
            let Ok(tier) = select.value().parse::<TierSelector>() else {
                return;
            };
            let mut config = engine.borrow().config().clone();
            config.tier = tier;
            engine.borrow_mut().apply_config(config);
            resync(&engine, &hud);
        })
    };
    let on_mode = {
        let engine = engine.clone();
        let hud = hud.clone();
        Callback::from(move |e: Event| {
            let Some(select) = e.target_dyn_into::<HtmlSelectElement>() else {
                return;
            };
            let Ok(mode) = select.value().parse::<PracticeMode>() else {
                return;
            };
            let mut config = engine.borrow().config().clone();
            config.mode = mode;
            engine.borrow_mut().apply_config(config);
            resync(&engine, &hud);
        })
    };
    let on_keep_angle = {
        let engine = engine.clone();
        let hud = hud.clone();
        Callback::from(move |e: Event| {
            let Some(input) = e.target_dyn_into::<HtmlInputElement>() else {
                return;
            };
            let mut config = engine.borrow().config().clone();
            config.keep_angle = input.checked();
            engine.borrow_mut().apply_config(config);
            resync(&engine, &hud);
        })
    };

    html! {
        <main class="trainer">
            <header class="hud">
                <h1>{ "Formdrill" }</h1>
                <p class="shape-label">{ hud.shape_name.clone() }</p>
                <p class="timer-label">{ hud.clock.clone() }</p>
                <p class="mode-label">{ hud.mode_line.clone() }</p>
                <p class="next-in">{ format!("Next in: {}", hud.next_in) }</p>
                <p class="session-counters">
                    { format!("Rounds {} / Streak {}", hud.session_rounds, hud.session_streak) }
                </p>
                <p class="notice" aria-live="polite">
                    { hud.notice.clone().unwrap_or_default() }
                </p>
            </header>

            <section class="controls">
                <Button label="Start" disabled={hud.running} onclick={on_start} />
                <Button label="Pause" disabled={!hud.running} onclick={on_pause} />
                <Button label="Next" onclick={on_next} />
                <Button label="Mark mistake" onclick={on_mark} />
                <Button
                    label={format!("Clear mistakes ({})", hud.mistake_count)}
                    onclick={on_clear}
                />
                <Button label="Reset stats" onclick={on_reset} />

                <label>
                    { "Duration" }
                    <select onchange={on_duration}>
                        { for DURATION_CHOICES.iter().map(|d| html! {
                            <option
                                value={d.to_string()}
                                selected={(*d - hud.duration_seconds).abs() < f64::EPSILON}
                            >
                                { format_short_duration(*d) }
                            </option>
                        }) }
                    </select>
                </label>
                <label>
                    { "Auto-switch" }
                    <select onchange={on_auto_switch}>
                        { for AUTO_SWITCH_CHOICES.iter().map(|a| {
                            let text = if *a > 0.0 {
                                format_short_duration(*a)
                            } else {
                                "Off".to_string()
                            };
                            html! {
                                <option
                                    value={a.to_string()}
                                    selected={(*a - hud.auto_switch_seconds).abs() < f64::EPSILON}
                                >
                                    { text }
                                </option>
                            }
                        }) }
                    </select>
                </label>
                <label>
                    { "Shapes" }
                    <select onchange={on_tier}>
                        <option value="mixed" selected={hud.tier_value == "mixed"}>
                            { "Mixed" }
                        </option>
                        { for (1..=max_tier).map(|t| html! {
                            <option
                                value={t.to_string()}
                                selected={hud.tier_value == t.to_string()}
                            >
                                { format!("Tier {t}") }
                            </option>
                        }) }
                    </select>
                </label>
                <label>
                    { "Practice" }
                    <select onchange={on_mode}>
                        <option value="normal" selected={hud.mode_value == "normal"}>
                            { "Normal" }
                        </option>
                        <option
                            value="repeat-mistakes"
                            selected={hud.mode_value == "repeat-mistakes"}
                        >
                            { "Repeat Mistakes" }
                        </option>
                    </select>
                </label>
                <label>
                    <input type="checkbox" checked={hud.keep_angle} onchange={on_keep_angle} />
                    { "Same shape, new angle" }
                </label>
            </section>

            <section class="stats">
                <h2>{ "Statistics" }</h2>
                <ul>
                    <li>{ format!("Total rounds: {}", hud.total_rounds) }</li>
                    <li>{ format!("Total time: {}", hud.total_time) }</li>
                    <li>{ format!("Best streak: {}", hud.best_streak) }</li>
                    <li>{ format!("Average round: {}", hud.avg_round) }</li>
                </ul>
            </section>

            // The external renderer listens for shape events and draws here.
            <canvas id="scene"></canvas>
        </main>
    }
}
