pub mod animation;
pub mod config;
pub mod data;
pub mod pages;
pub mod styles;

use crate::pages::wheel::WheelPage;
use yew::prelude::*;

#[function_component(App)]
pub fn app() -> Html {
    // The backend is chosen once; switching mode reloads the page.
    let backend = use_memo((), |_| data::connect(config::determine_mode()));

    html! {
        <div class={styles::CONTAINER}>
            <div class={styles::CONTAINER_LG}>
                <WheelPage backend={(*backend).clone()} />
            </div>
        </div>
    }
}
