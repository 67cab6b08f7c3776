use yew::prelude::*;

#[derive(Properties, PartialEq, Clone)]
pub struct Props {
    pub label: AttrValue,
    #[prop_or_default]
    pub onclick: Callback<MouseEvent>,
    #[prop_or_default]
    pub disabled: bool,
}

#[function_component(Button)]
pub fn button(p: &Props) -> Html {
    let onclick = p.onclick.clone();
    let label = p.label.clone();
    html! { <button {onclick} disabled={p.disabled}>{ label }</button> }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::executor::block_on;
    use yew::LocalServerRenderer;

    #[test]
    fn button_renders_label() {
        let props = Props {
            label: AttrValue::from("Mark mistake"),
            onclick: Callback::noop(),
            disabled: false,
        };
        let html = block_on(LocalServerRenderer::<Button>::with_props(props).render());
        assert!(html.contains("Mark mistake"));
    }

    #[test]
    fn button_renders_disabled_state() {
        let props = Props {
            label: AttrValue::from("Start"),
            onclick: Callback::noop(),
            disabled: true,
        };
        let html = block_on(LocalServerRenderer::<Button>::with_props(props).render());
        assert!(html.contains("disabled"));
    }
}
