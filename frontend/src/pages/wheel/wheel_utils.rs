use crate::styles;
use shared::store::HistoryEntry;
use shared::wheel::{WheelOption, MIN_OPTIONS};
use web_sys::HtmlInputElement;
use yew::prelude::*;

pub const COLORS: [&str; 8] = [
    "#6366f1", "#ec4899", "#8b5cf6", "#14b8a6", "#f59e0b", "#ef4444", "#3b82f6", "#10b981",
];

pub fn slice_color(index: usize) -> &'static str {
    COLORS[index % COLORS.len()]
}

/// Removal is refused client-side before asking the store, so the user gets the message
/// without a round trip.
pub fn can_remove(option_count: usize) -> bool {
    option_count > MIN_OPTIONS
}

/// Today's date in UTC, `YYYY-MM-DD`.
pub fn today() -> String {
    chrono::Utc::now().format("%Y-%m-%d").to_string()
}

#[derive(Debug, Clone, PartialEq)]
pub enum ConnectionStatus {
    Connecting,
    Online,
    Offline,
    Error(String),
}

impl ConnectionStatus {
    pub fn label(&self) -> String {
        match self {
            ConnectionStatus::Connecting => "Connecting...".to_string(),
            ConnectionStatus::Online => "Online".to_string(),
            ConnectionStatus::Offline => "Offline mode".to_string(),
            ConnectionStatus::Error(_) => "Connection error".to_string(),
        }
    }

    pub fn class(&self) -> &'static str {
        match self {
            ConnectionStatus::Connecting => styles::STATUS_PENDING,
            ConnectionStatus::Online => styles::STATUS_ONLINE,
            ConnectionStatus::Offline => styles::STATUS_OFFLINE,
            ConnectionStatus::Error(_) => styles::STATUS_ERROR,
        }
    }
}

#[derive(Properties, PartialEq)]
pub struct StatusBadgeProps {
    pub status: ConnectionStatus,
}

#[function_component(StatusBadge)]
pub fn status_badge(props: &StatusBadgeProps) -> Html {
    let title = match &props.status {
        ConnectionStatus::Error(reason) => reason.clone(),
        _ => String::new(),
    };
    html! {
        <span class={props.status.class()} title={title}>{props.status.label()}</span>
    }
}

#[derive(Properties, PartialEq)]
pub struct SpinButtonProps {
    pub is_spinning: bool,
    pub onclick: Callback<MouseEvent>,
}

#[function_component(SpinButton)]
pub fn spin_button(props: &SpinButtonProps) -> Html {
    let button_class = if props.is_spinning {
        "bg-gradient-to-r from-gray-400 to-gray-500 opacity-75 cursor-not-allowed text-white"
    } else {
        "bg-gradient-to-r from-yellow-400 to-orange-500 hover:from-yellow-500 hover:to-orange-600 text-white shadow-lg hover:shadow-xl transform hover:-translate-y-0.5 active:translate-y-0"
    };

    html! {
        <button
            onclick={props.onclick.clone()}
            disabled={props.is_spinning}
            class={classes!(
                "w-full",
                "px-8",
                "py-4",
                "rounded-full",
                "font-bold",
                "text-lg",
                "transition-all",
                "duration-300",
                button_class
            )}
        >
            { if props.is_spinning { "Spinning..." } else { "Spin!" } }
        </button>
    }
}

#[derive(Properties, PartialEq)]
pub struct ResultModalProps {
    pub winner: Option<WheelOption>,
    pub record_date: String,
    pub on_date_change: Callback<String>,
    pub on_accept: Callback<()>,
    pub on_retry: Callback<()>,
    pub on_cancel: Callback<()>,
}

#[function_component(ResultModal)]
pub fn result_modal(props: &ResultModalProps) -> Html {
    let Some(winner) = &props.winner else {
        return html! {};
    };

    let on_date_input = {
        let on_date_change = props.on_date_change.clone();
        Callback::from(move |e: InputEvent| {
            let input: HtmlInputElement = e.target_unchecked_into();
            on_date_change.emit(input.value());
        })
    };
    let accept = props.on_accept.reform(|_: MouseEvent| ());
    let retry = props.on_retry.reform(|_: MouseEvent| ());
    let cancel = props.on_cancel.reform(|_: MouseEvent| ());

    html! {
        <div class={styles::MODAL_BACKDROP}>
            <div class={styles::MODAL_CARD}>
                <p class={styles::TEXT_BODY}>{"Today you're eating:"}</p>
                <div class={styles::MODAL_WINNER}>{&winner.label}</div>
                <label class={styles::TEXT_SMALL} for="record-date">{"Date"}</label>
                <input
                    id="record-date"
                    type="date"
                    class={styles::INPUT}
                    value={props.record_date.clone()}
                    oninput={on_date_input}
                />
                <div class="mt-6 flex gap-3 justify-center">
                    <button class={styles::BUTTON_PRIMARY} onclick={accept}>{"Accept"}</button>
                    <button class={styles::BUTTON_SECONDARY} onclick={retry}>{"Spin again"}</button>
                    <button class={styles::BUTTON_SECONDARY} onclick={cancel}>{"Cancel"}</button>
                </div>
            </div>
        </div>
    }
}

#[derive(Properties, PartialEq)]
pub struct OptionListProps {
    pub options: Vec<WheelOption>,
    pub disabled: bool,
    pub on_remove: Callback<String>,
}

#[function_component(OptionList)]
pub fn option_list(props: &OptionListProps) -> Html {
    html! {
        <ul class="mt-4 divide-y divide-gray-200 dark:divide-gray-700">
            { for props.options.iter().enumerate().map(|(index, option)| {
                let on_remove = props.on_remove.clone();
                let id = option.id.clone();
                html! {
                    <li key={option.id.clone()} class="flex items-center justify-between py-2">
                        <span class="flex items-center gap-2">
                            <span
                                class="inline-block w-3 h-3 rounded-full"
                                style={format!("background-color: {}", slice_color(index))}
                            />
                            <span class={styles::TEXT_BODY}>{&option.label}</span>
                        </span>
                        <button
                            class={styles::BUTTON_ICON}
                            disabled={props.disabled}
                            title="Remove"
                            onclick={Callback::from(move |_| on_remove.emit(id.clone()))}
                        >
                            {"×"}
                        </button>
                    </li>
                }
            })}
        </ul>
    }
}

#[derive(Properties, PartialEq)]
pub struct HistoryTableProps {
    pub entries: Vec<HistoryEntry>,
}

#[function_component(HistoryTable)]
pub fn history_table(props: &HistoryTableProps) -> Html {
    if props.entries.is_empty() {
        return html! {
            <p class={classes!(styles::TEXT_SMALL, "mt-4")}>{"Nothing recorded yet."}</p>
        };
    }

    html! {
        <table class="mt-4 w-full text-left">
            <thead>
                <tr class={styles::TEXT_SMALL}>
                    <th class="py-1">{"Date"}</th>
                    <th class="py-1">{"Food"}</th>
                </tr>
            </thead>
            <tbody>
                { for props.entries.iter().map(|entry| html! {
                    <tr key={entry.id.clone()} class={styles::TEXT_BODY}>
                        <td class="py-1">{entry.display_date()}</td>
                        <td class="py-1">{&entry.label}</td>
                    </tr>
                })}
            </tbody>
        </table>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slice_color_cycles() {
        assert_eq!(slice_color(0), "#6366f1");
        assert_eq!(slice_color(7), "#10b981");
        assert_eq!(slice_color(8), slice_color(0));
        assert_eq!(slice_color(13), slice_color(5));
    }

    #[test]
    fn test_can_remove() {
        assert!(!can_remove(0));
        assert!(!can_remove(2));
        assert!(can_remove(3));
    }

    #[test]
    fn test_today_is_iso() {
        assert!(shared::validation::validate_date(&today()).is_ok());
    }

    #[test]
    fn test_today_uses_utc_calendar() {
        let before = chrono::Utc::now().date_naive().to_string();
        let value = today();
        let after = chrono::Utc::now().date_naive().to_string();
        assert!(value == before || value == after, "{} not in [{}, {}]", value, before, after);
    }

    #[test]
    fn test_status_labels() {
        assert_eq!(ConnectionStatus::Online.label(), "Online");
        assert_eq!(
            ConnectionStatus::Error("timeout".to_string()).class(),
            styles::STATUS_ERROR
        );
    }
}
