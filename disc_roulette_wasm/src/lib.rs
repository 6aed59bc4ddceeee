use std::cell::RefCell;
use std::rc::Rc;

use disc_roulette_core::{
    pick_item, RouletteError, SelectableItem, SelectableItemStore, SpinSequencer, UniformPicker,
    ITEM_ANIMATION, REEL_ANIMATION,
};
use disc_roulette_shared::SpinView;
use gloo_timers::future::TimeoutFuture;
use wasm_bindgen::prelude::*;
use web_sys::HtmlInputElement;
use yew::prelude::*;

mod platform;

use platform::{alert, JsRandom, LocalStorage};

/// One picker shared by every tab. Compared by identity for yew props.
#[derive(Clone)]
struct SharedPicker(Rc<RefCell<UniformPicker<JsRandom>>>);

impl PartialEq for SharedPicker {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
enum Tab {
    Disc21,
    Disc20,
    Grouped21,
    Machines,
}

impl Tab {
    const ALL: [Tab; 4] = [Tab::Disc21, Tab::Disc20, Tab::Grouped21, Tab::Machines];

    fn title(self) -> &'static str {
        match self {
            Tab::Disc21 => "21コマ",
            Tab::Disc20 => "20コマ",
            Tab::Grouped21 => "21コマ（グループ）",
            Tab::Machines => "機種ルーレット",
        }
    }

    fn sequencer(self) -> Option<SpinSequencer> {
        match self {
            Tab::Disc21 => Some(SpinSequencer::disc21()),
            Tab::Disc20 => Some(SpinSequencer::disc20()),
            Tab::Grouped21 => Some(SpinSequencer::grouped21()),
            Tab::Machines => None,
        }
    }
}

const SELECT_PROMPT: &str = "少なくとも1機種は選択してください";

fn user_message(err: &RouletteError) -> String {
    match err {
        RouletteError::SpinLimitExceeded { limit } => {
            format!("{limit}回転まで記録済みです。履歴をクリアしてください")
        }
        RouletteError::InvalidArgument(reason) => reason.clone(),
        RouletteError::OutOfRange { index, len } => {
            format!("{}番目の機種はありません（登録数 {len}）", index + 1)
        }
        RouletteError::PersistenceRead { reason, .. } => {
            format!("機種リストを読み込めませんでした: {reason}")
        }
        RouletteError::PersistenceWrite { reason, .. } => {
            format!("機種リストを保存できませんでした: {reason}")
        }
        other => other.to_string(),
    }
}

#[function_component(App)]
fn app() -> Html {
    let active = use_state(|| Tab::Disc21);
    let picker = use_memo((), |_| SharedPicker(Rc::new(RefCell::new(UniformPicker::new(JsRandom)))));
    let picker = (*picker).clone();

    let tabs = Tab::ALL.iter().map(|&tab| {
        let active = active.clone();
        let class = if *active == tab { "tab-btn active" } else { "tab-btn" };
        html! {
            <button class={class} onclick={Callback::from(move |_: MouseEvent| active.set(tab))}>{ tab.title() }</button>
        }
    });

    // every panel stays mounted so reel history survives tab switches
    let panels = Tab::ALL.iter().map(|&tab| {
        let class = if *active == tab { "tab-content active" } else { "tab-content" };
        let body = if tab == Tab::Machines {
            html! { <MachinePanel picker={picker.clone()} /> }
        } else {
            html! { <ReelPanel tab={tab} picker={picker.clone()} /> }
        };
        html! { <section class={class}>{ body }</section> }
    });

    html! {
        <div>
            <h1>{"目押しルーレット"}</h1>
            <nav>{ for tabs }</nav>
            { for panels }
        </div>
    }
}

#[derive(Properties, PartialEq)]
struct ReelPanelProps {
    tab: Tab,
    picker: SharedPicker,
}

#[function_component(ReelPanel)]
fn reel_panel(props: &ReelPanelProps) -> Html {
    let tab = props.tab;
    let sequencer = use_mut_ref(move || tab.sequencer().unwrap_or_else(SpinSequencer::disc21));
    let shown = use_state(|| None::<SpinView>);
    let history = use_state(Vec::<SpinView>::new);
    let animating = use_state(|| false);
    let grouped = sequencer.borrow().layout().is_grouped();

    let on_spin = {
        let sequencer = sequencer.clone();
        let picker = props.picker.clone();
        let shown = shown.clone();
        let history = history.clone();
        let animating = animating.clone();
        Callback::from(move |_: MouseEvent| {
            if *animating {
                return;
            }
            if sequencer.borrow().is_exhausted() {
                alert(&user_message(&RouletteError::SpinLimitExceeded {
                    limit: sequencer.borrow().history().len(),
                }));
                return;
            }
            animating.set(true);
            let sequencer = sequencer.clone();
            let picker = picker.clone();
            let shown = shown.clone();
            let history = history.clone();
            let animating = animating.clone();
            wasm_bindgen_futures::spawn_local(async move {
                for _ in 0..REEL_ANIMATION.frames() {
                    TimeoutFuture::new(REEL_ANIMATION.interval_ms).await;
                    let frame = sequencer.borrow().preview(&mut picker.0.borrow_mut());
                    if let Ok(frame) = frame {
                        shown.set(Some(SpinView::from(&frame)));
                    }
                }
                let outcome = sequencer.borrow_mut().spin(&mut picker.0.borrow_mut());
                match outcome {
                    Ok(record) => {
                        shown.set(Some(SpinView::from(&record)));
                        history.set(sequencer.borrow().history().iter().map(SpinView::from).collect());
                    }
                    Err(err) => {
                        log::warn!("spin failed: {err}");
                        alert(&user_message(&err));
                    }
                }
                animating.set(false);
            });
        })
    };

    let on_clear = {
        let sequencer = sequencer.clone();
        let history = history.clone();
        let shown = shown.clone();
        let animating = animating.clone();
        Callback::from(move |_: MouseEvent| {
            if *animating {
                return;
            }
            sequencer.borrow_mut().reset();
            history.set(Vec::new());
            shown.set(None);
        })
    };

    let (left, right) = match &*shown {
        Some(view) => (view.left_text(), view.right_text()),
        None => ("-".to_string(), "-".to_string()),
    };
    let result_class = if *animating { "result-box animating" } else { "result-box" };

    html! {
        <div>
            <h2>{ tab.title() }</h2>
            <button class="btn" onclick={on_spin} disabled={*animating}>{"スタート"}</button>
            <div class={result_class}>
                <p>{"左リール: "}{ left }</p>
                <p>{"右リール: "}{ right }</p>
            </div>
            if grouped {
                <ol class="history">
                    { for history.iter().map(|view| html! {
                        <li>{ format!("[{}] {} / {}",
                            view.group_label.as_deref().unwrap_or("-"),
                            view.left_text(),
                            view.right_text()) }</li>
                    }) }
                </ol>
                <button class="btn btn-danger" onclick={on_clear}>{"履歴クリア"}</button>
            }
        </div>
    }
}

#[derive(Properties, PartialEq)]
struct MachinePanelProps {
    picker: SharedPicker,
}

#[function_component(MachinePanel)]
fn machine_panel(props: &MachinePanelProps) -> Html {
    let store = use_mut_ref(|| SelectableItemStore::open(LocalStorage));
    let items = use_state(|| match &*store.borrow() {
        Ok(store) => store.list().to_vec(),
        Err(_) => Vec::new(),
    });
    let input = use_state(String::new);
    let result = use_state(|| None::<String>);
    let animating = use_state(|| false);

    if let Err(err) = &*store.borrow() {
        log::error!("machine list unreadable: {err}");
        return html! { <p class="error">{ user_message(err) }</p> };
    }

    // runs a mutation, then refreshes the rendered snapshot
    let mutate = {
        let store = store.clone();
        let items = items.clone();
        move |f: &dyn Fn(&mut SelectableItemStore<LocalStorage>) -> Result<(), RouletteError>| {
            if let Ok(store) = &mut *store.borrow_mut() {
                if let Err(err) = f(store) {
                    alert(&user_message(&err));
                }
                items.set(store.list().to_vec());
            }
        }
    };

    let add = {
        let mutate = mutate.clone();
        let input = input.clone();
        move || {
            let name = (*input).clone();
            mutate(&|store| {
                store.add(&name).map_err(|err| match err {
                    RouletteError::InvalidArgument(_) => {
                        RouletteError::InvalidArgument("機種名を入力してください".into())
                    }
                    other => other,
                })
            });
            input.set(String::new());
        }
    };

    let on_input = {
        let input = input.clone();
        Callback::from(move |e: InputEvent| {
            let el: HtmlInputElement = e.target_unchecked_into();
            input.set(el.value());
        })
    };
    let on_add = {
        let add = add.clone();
        Callback::from(move |_: MouseEvent| add())
    };
    let on_keypress = Callback::from(move |e: KeyboardEvent| {
        if e.key() == "Enter" {
            add();
        }
    });

    let on_pick = {
        let store = store.clone();
        let picker = props.picker.clone();
        let result = result.clone();
        let animating = animating.clone();
        Callback::from(move |_: MouseEvent| {
            if *animating {
                return;
            }
            let candidates: Vec<String> = match &*store.borrow() {
                Ok(store) => store.selected_subset().iter().map(|i| i.name.clone()).collect(),
                Err(_) => return,
            };
            if candidates.is_empty() {
                alert(SELECT_PROMPT);
                return;
            }
            animating.set(true);
            let store = store.clone();
            let picker = picker.clone();
            let result = result.clone();
            let animating = animating.clone();
            wasm_bindgen_futures::spawn_local(async move {
                for _ in 0..ITEM_ANIMATION.frames() {
                    TimeoutFuture::new(ITEM_ANIMATION.interval_ms).await;
                    let frame = picker.0.borrow_mut().pick_from(&candidates).cloned();
                    if let Ok(name) = frame {
                        result.set(Some(name));
                    }
                }
                let outcome = match &*store.borrow() {
                    Ok(store) => pick_item(store, &mut picker.0.borrow_mut()),
                    Err(err) => Err(err.clone()),
                };
                match outcome {
                    Ok(item) => result.set(Some(item.name)),
                    Err(RouletteError::InvalidArgument(_)) => {
                        alert(SELECT_PROMPT);
                        result.set(None);
                    }
                    Err(err) => alert(&user_message(&err)),
                }
                animating.set(false);
            });
        })
    };

    let rows = items.iter().enumerate().map(|(index, item): (usize, &SelectableItem)| {
        let on_toggle = {
            let mutate = mutate.clone();
            Callback::from(move |e: Event| {
                let el: HtmlInputElement = e.target_unchecked_into();
                let checked = el.checked();
                mutate(&|store| store.set_selected(index, checked));
            })
        };
        let on_delete = {
            let mutate = mutate.clone();
            Callback::from(move |_: MouseEvent| mutate(&|store| store.remove(index).map(|_| ())))
        };
        html! {
            <li class="machine-item" key={format!("{index}-{}", item.name)}>
                <input type="checkbox" checked={item.selected} onchange={on_toggle} />
                <span class="machine-name">{ item.name.clone() }</span>
                <button class="btn btn-danger btn-small" onclick={on_delete}>{"削除"}</button>
            </li>
        }
    });

    let result_class = if *animating { "result-box animating" } else { "result-box" };

    html! {
        <div>
            <div class="machine-form">
                <input type="text" value={(*input).clone()} oninput={on_input} onkeypress={on_keypress} placeholder="機種名" />
                <button class="btn" onclick={on_add}>{"追加"}</button>
            </div>
            if items.is_empty() {
                <p class="empty-message">{"機種が登録されていません"}</p>
            } else {
                <ul class="machine-list">{ for rows }</ul>
            }
            <button class="btn" onclick={on_pick} disabled={*animating}>{"ルーレット"}</button>
            <div class={result_class}>
                <p>{ (*result).clone().unwrap_or_else(|| "-".to_string()) }</p>
            </div>
        </div>
    }
}

#[wasm_bindgen(start)]
pub fn run() {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).ok();
    yew::Renderer::<App>::new().render();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reel_tabs_map_to_sequencers() {
        assert_eq!(Tab::Disc21.sequencer().unwrap().layout().size, 21);
        assert_eq!(Tab::Disc20.sequencer().unwrap().layout().size, 20);
        assert!(Tab::Grouped21.sequencer().unwrap().layout().is_grouped());
        assert!(Tab::Machines.sequencer().is_none());
    }

    #[test]
    fn spin_limit_reads_as_a_prompt() {
        let message = user_message(&RouletteError::SpinLimitExceeded { limit: 3 });
        assert!(message.starts_with("3回転"));
    }

    #[test]
    fn machine_errors_read_in_japanese() {
        let message = user_message(&RouletteError::OutOfRange { index: 4, len: 2 });
        assert_eq!(message, "5番目の機種はありません（登録数 2）");
        let message = user_message(&RouletteError::PersistenceWrite {
            key: "k".into(),
            reason: "quota exceeded".into(),
        });
        assert!(message.starts_with("機種リストを保存できませんでした"));
        let message = user_message(&RouletteError::InvalidArgument("機種名を入力してください".into()));
        assert_eq!(message, "機種名を入力してください");
    }
}
