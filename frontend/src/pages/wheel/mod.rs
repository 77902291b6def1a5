mod wheel_canvas;
mod wheel_utils;

use crate::animation::BrowserFrameScheduler;
use crate::config::{is_file_protocol, set_mode, AppMode, POLL_INTERVAL_MS};
use crate::data::BackendHandle;
use crate::styles;
use gloo::dialogs::{alert, confirm};
use gloo_timers::callback::Interval;
use shared::api::Snapshot;
use shared::spin::{RenderSink, RngSource, SpinConfig, SpinController, SpinDriver};
use shared::store::{NewHistoryEntry, StoreError};
use shared::wheel::{WheelError, WheelModel, WheelOption};
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen_futures::spawn_local;
use web_sys::HtmlInputElement;
use yew::prelude::*;

use wheel_canvas::WheelCanvas;
use wheel_utils::{
    can_remove, today, ConnectionStatus, HistoryTable, OptionList, ResultModal, SpinButton,
    StatusBadge,
};

/// What the canvas shows on the current frame.
#[derive(Clone, PartialEq, Default)]
struct WheelFrame {
    options: Vec<WheelOption>,
    rotation: f64,
}

#[derive(Properties, PartialEq)]
pub struct WheelPageProps {
    pub backend: BackendHandle,
}

fn initial_status(mode: AppMode) -> ConnectionStatus {
    match mode {
        AppMode::Online => ConnectionStatus::Connecting,
        AppMode::Offline => ConnectionStatus::Offline,
    }
}

#[function_component(WheelPage)]
pub fn wheel_page(props: &WheelPageProps) -> Html {
    let backend = props.backend.clone();
    let mode = backend.mode();

    let snapshot = use_state_eq(Snapshot::default);
    let frame = use_state(WheelFrame::default);
    let is_spinning = use_state(|| false);
    let winner = use_state(|| None::<WheelOption>);
    let record_date = use_state(today);
    let new_label = use_state(String::new);
    let status = use_state(|| initial_status(mode));

    let driver: Rc<SpinDriver> = {
        let frame = frame.setter();
        (*use_memo((), move |_| {
            let controller = Rc::new(RefCell::new(SpinController::new(
                WheelModel::default(),
                SpinConfig::default(),
            )));
            let sink: Rc<RefCell<dyn RenderSink>> = Rc::new(RefCell::new(
                move |options: &[WheelOption], rotation: f64| {
                    frame.set(WheelFrame {
                        options: options.to_vec(),
                        rotation,
                    });
                },
            ));
            SpinDriver::new(controller, Rc::new(BrowserFrameScheduler), sink)
        }))
        .clone()
    };

    // Keep the wheel in step with the option list
    {
        let driver = driver.clone();
        use_effect_with(snapshot.foods.clone(), move |foods| {
            driver.controller().borrow_mut().set_options(foods.clone());
            driver.draw();
            || ()
        });
    }

    let refresh = {
        let backend = backend.clone();
        let snapshot = snapshot.clone();
        let status = status.clone();
        Callback::from(move |_: ()| {
            let backend = backend.clone();
            let snapshot = snapshot.clone();
            let status = status.clone();
            spawn_local(async move {
                match backend.snapshot().await {
                    Ok(latest) => {
                        snapshot.set(latest);
                        if backend.mode() == AppMode::Online {
                            status.set(ConnectionStatus::Online);
                        }
                    }
                    Err(e) => {
                        log::error!("Failed to refresh: {}", e);
                        status.set(ConnectionStatus::Error(e.to_string()));
                    }
                }
            });
        })
    };

    // Initial load, plus polling when a server holds the data
    {
        let backend = backend.clone();
        let snapshot = snapshot.clone();
        let status = status.clone();
        let refresh = refresh.clone();
        use_effect_with((), move |_| {
            let poll_backend = backend.clone();
            spawn_local(async move {
                match backend.snapshot().await {
                    Ok(latest) => {
                        snapshot.set(latest);
                        if backend.mode() == AppMode::Online {
                            status.set(ConnectionStatus::Online);
                        }
                    }
                    Err(e) if backend.mode() == AppMode::Online => {
                        log::error!("Server unavailable, falling back to offline: {}", e);
                        alert("Could not reach the server. Switching to offline mode.");
                        set_mode(AppMode::Offline);
                    }
                    Err(e) => {
                        log::error!("Failed to load local data: {}", e);
                        status.set(ConnectionStatus::Error(e.to_string()));
                    }
                }
            });

            let interval = (poll_backend.mode() == AppMode::Online)
                .then(|| Interval::new(POLL_INTERVAL_MS, move || refresh.emit(())));

            move || drop(interval)
        });
    }

    let spin = {
        let driver = driver.clone();
        let is_spinning = is_spinning.clone();
        let winner = winner.clone();
        Callback::from(move |_: ()| {
            winner.set(None);
            let on_result = {
                let is_spinning = is_spinning.clone();
                let winner = winner.clone();
                let redraw = Rc::downgrade(&driver);
                move |choice: WheelOption| {
                    log::info!("Wheel landed on '{}'", choice.label);
                    // Picks up any option change that arrived mid-spin
                    if let Some(driver) = redraw.upgrade() {
                        driver.draw();
                    }
                    is_spinning.set(false);
                    winner.set(Some(choice));
                }
            };

            let mut rng = RngSource::thread();
            match driver.spin(&mut rng, on_result) {
                Ok(plan) => {
                    log::debug!(
                        "Spinning from {:.3} to {:.3}",
                        plan.start_rotation,
                        plan.target_rotation
                    );
                    is_spinning.set(true);
                }
                Err(WheelError::InsufficientOptions) => alert("You need at least 2 options!"),
                Err(WheelError::AlreadySpinning) => {}
                Err(e) => log::error!("Failed to start spin: {}", e),
            }
        })
    };

    let on_accept = {
        let backend = backend.clone();
        let winner = winner.clone();
        let record_date = record_date.clone();
        let refresh = refresh.clone();
        Callback::from(move |_: ()| {
            let Some(choice) = (*winner).clone() else {
                return;
            };
            winner.set(None);

            let entry = NewHistoryEntry {
                date: (*record_date).clone(),
                label: choice.label,
            };
            let backend = backend.clone();
            let refresh = refresh.clone();
            spawn_local(async move {
                match backend.append_history(entry).await {
                    Ok(_) => refresh.emit(()),
                    Err(e) => {
                        log::error!("Failed to record result: {}", e);
                        alert(&format!("Could not save history: {}", e));
                    }
                }
            });
        })
    };

    let on_retry = {
        let winner = winner.clone();
        let spin = spin.clone();
        Callback::from(move |_: ()| {
            winner.set(None);
            spin.emit(());
        })
    };

    let on_cancel = {
        let winner = winner.clone();
        Callback::from(move |_: ()| winner.set(None))
    };

    let on_date_change = {
        let record_date = record_date.clone();
        Callback::from(move |date: String| record_date.set(date))
    };

    let add_option = {
        let backend = backend.clone();
        let new_label = new_label.clone();
        let snapshot = snapshot.clone();
        let refresh = refresh.clone();
        Callback::from(move |_: ()| {
            let label = new_label.trim().to_string();
            if label.is_empty() {
                return;
            }
            let wanted = label.to_lowercase();
            if snapshot.foods.iter().any(|f| f.label.to_lowercase() == wanted) {
                alert("That food is already on the wheel.");
                return;
            }

            let backend = backend.clone();
            let new_label = new_label.clone();
            let refresh = refresh.clone();
            spawn_local(async move {
                match backend.add_option(label).await {
                    Ok(option) => {
                        log::info!("Added '{}'", option.label);
                        new_label.set(String::new());
                        refresh.emit(());
                    }
                    Err(StoreError::DuplicateLabel(_)) => {
                        alert("That food is already on the wheel.");
                    }
                    Err(e) => {
                        log::error!("Failed to add option: {}", e);
                        alert(&format!("Could not add option: {}", e));
                    }
                }
            });
        })
    };

    let on_remove = {
        let backend = backend.clone();
        let snapshot = snapshot.clone();
        let refresh = refresh.clone();
        Callback::from(move |id: String| {
            if !can_remove(snapshot.foods.len()) {
                alert("Keep at least 2 options.");
                return;
            }
            let backend = backend.clone();
            let refresh = refresh.clone();
            spawn_local(async move {
                match backend.remove_option(id).await {
                    Ok(()) => refresh.emit(()),
                    Err(e) => {
                        log::error!("Failed to remove option: {}", e);
                        alert(&format!("Could not remove option: {}", e));
                    }
                }
            });
        })
    };

    let on_clear_history = {
        let backend = backend.clone();
        let refresh = refresh.clone();
        Callback::from(move |_: MouseEvent| {
            if !confirm("Clear the whole history?") {
                return;
            }
            let backend = backend.clone();
            let refresh = refresh.clone();
            spawn_local(async move {
                match backend.clear_history().await {
                    Ok(()) => refresh.emit(()),
                    Err(e) => {
                        log::error!("Failed to clear history: {}", e);
                        alert(&format!("Could not clear history: {}", e));
                    }
                }
            });
        })
    };

    let on_label_input = {
        let new_label = new_label.clone();
        Callback::from(move |e: InputEvent| {
            let input: HtmlInputElement = e.target_unchecked_into();
            new_label.set(input.value());
        })
    };

    let on_label_keypress = {
        let add_option = add_option.clone();
        Callback::from(move |e: KeyboardEvent| {
            if e.key() == "Enter" {
                add_option.emit(());
            }
        })
    };

    let on_toggle_mode = Callback::from(move |_: MouseEvent| match mode {
        AppMode::Online => set_mode(AppMode::Offline),
        AppMode::Offline => {
            if is_file_protocol() {
                alert("Online mode is not available when the page is opened from a file.");
                return;
            }
            set_mode(AppMode::Online);
        }
    });

    let spinning = *is_spinning;

    html! {
        <div class="space-y-6">
            <header class="flex flex-wrap items-center justify-between gap-4">
                <h1 class={styles::TEXT_H1}>{"What's for lunch?"}</h1>
                <div class="flex items-center gap-3">
                    <StatusBadge status={(*status).clone()} />
                    <button class={styles::BUTTON_SECONDARY} onclick={on_toggle_mode} disabled={spinning}>
                        { match mode {
                            AppMode::Online => "Switch to offline",
                            AppMode::Offline => "Switch to online",
                        } }
                    </button>
                </div>
            </header>

            <div class="grid grid-cols-1 lg:grid-cols-3 gap-6">
                <div class={classes!(styles::CARD, "lg:col-span-2", "flex", "flex-col", "items-center", "gap-6")}>
                    <WheelCanvas
                        options={frame.options.clone()}
                        rotation={frame.rotation}
                        is_spinning={spinning}
                    />
                    <div class="w-full max-w-xs">
                        <SpinButton is_spinning={spinning} onclick={spin.reform(|_: MouseEvent| ())} />
                    </div>
                </div>

                <div class="space-y-6">
                    <div class={styles::CARD}>
                        <h3 class={styles::TEXT_H3}>{"Options"}</h3>
                        <div class="mt-4 flex gap-2">
                            <input
                                type="text"
                                class={styles::INPUT}
                                placeholder="New food"
                                value={(*new_label).clone()}
                                oninput={on_label_input}
                                onkeypress={on_label_keypress}
                                disabled={spinning}
                            />
                            <button
                                class={styles::BUTTON_PRIMARY}
                                onclick={add_option.reform(|_: MouseEvent| ())}
                                disabled={spinning}
                            >
                                {"Add"}
                            </button>
                        </div>
                        <OptionList
                            options={snapshot.foods.clone()}
                            disabled={spinning}
                            on_remove={on_remove}
                        />
                    </div>

                    <div class={styles::CARD}>
                        <div class="flex items-center justify-between">
                            <h3 class={styles::TEXT_H3}>{"History"}</h3>
                            <button
                                class={styles::BUTTON_DANGER}
                                onclick={on_clear_history}
                                disabled={snapshot.history.is_empty()}
                            >
                                {"Clear"}
                            </button>
                        </div>
                        <HistoryTable entries={snapshot.history.clone()} />
                    </div>
                </div>
            </div>

            <ResultModal
                winner={(*winner).clone()}
                record_date={(*record_date).clone()}
                on_date_change={on_date_change}
                on_accept={on_accept}
                on_retry={on_retry}
                on_cancel={on_cancel}
            />
        </div>
    }
}
