use url::form_urlencoded;

use crate::filter::{ScheduleFilter, Selection, Selections};
use crate::models::{Day, Intensity, ScheduleEntry, SessionType};

pub const EMPTY_PLACEHOLDER: &str = "No sessions found matching your Forge filters.";
pub const RESULTS_CONTAINER_ID: &str = "schedule-results";

const BUTTON_BASE: &str =
    "px-3 py-1.5 text-[11px] font-bold uppercase tracking-widest transition-all rounded-sm border";
const BUTTON_IDLE: &str =
    "bg-transparent text-muted border-white/10 hover:border-white/30 hover:text-white";

/// Set up once per results container, the first time it is rendered.
pub trait TransitionHook {
    fn setup(&self, container_id: &str) -> String;
}

/// Animates additions, removals and moves among the container's children
/// with `@formkit/auto-animate`.
#[derive(Debug, Clone)]
pub struct AutoAnimate {
    src: String,
}

impl AutoAnimate {
    pub fn new(src: impl Into<String>) -> Self {
        Self { src: src.into() }
    }
}

impl TransitionHook for AutoAnimate {
    fn setup(&self, container_id: &str) -> String {
        format!(
            r#"<script type="module">import autoAnimate from {src}; const el = document.getElementById({id}); if (el) {{ autoAnimate(el); }}</script>"#,
            src = js_string(&self.src),
            id = js_string(container_id),
        )
    }
}

/// `raw` as a JavaScript string literal that is safe inside a `<script>` element.
fn js_string(raw: &str) -> String {
    serde_json::Value::from(raw).to_string().replace("</", "<\\/")
}

pub struct ResultsContainer<'h> {
    id: String,
    hook: &'h dyn TransitionHook,
    mounted: bool,
}

impl<'h> ResultsContainer<'h> {
    pub fn new(id: impl Into<String>, hook: &'h dyn TransitionHook) -> Self {
        Self {
            id: id.into(),
            hook,
            mounted: false,
        }
    }

    pub fn render(&mut self, entries: &[ScheduleEntry<'_>]) -> String {
        let mut html = format!(
            r#"<div id="{}" class="grid grid-cols-1 md:grid-cols-2 lg:grid-cols-3 gap-6">"#,
            escape_html(&self.id)
        );
        if entries.is_empty() {
            html.push_str(&format!(
                r#"<div class="schedule-empty col-span-full py-20 text-center border border-dashed border-white/10 rounded-sm"><p class="text-muted font-heading uppercase tracking-widest text-sm">{EMPTY_PLACEHOLDER}</p></div>"#
            ));
        }
        for entry in entries {
            render_card(&mut html, entry);
        }
        html.push_str("</div>");

        if !self.mounted {
            self.mounted = true;
            html.push_str(&self.hook.setup(&self.id));
        }
        html
    }
}

fn render_card(html: &mut String, entry: &ScheduleEntry<'_>) {
    let c = entry.session;
    let name = escape_html(&c.name);
    let spots_class = if c.spots_left <= 5 { "text-signal" } else { "text-flux" };
    html.push_str(&format!(
        concat!(
            r#"<div class="class-card group relative p-6 bg-armor border border-white/5 rounded-sm hover:border-volt/30 transition-all duration-300" data-slug="{slug}">"#,
            r#"<div class="flex justify-between items-start mb-6"><div>"#,
            r#"<span class="class-type inline-block px-2 py-0.5 bg-void text-volt text-[10px] font-black uppercase tracking-[0.2em] mb-3 border border-volt/20">{kind}</span>"#,
            r#"<h3 class="class-name font-heading font-black text-xl uppercase tracking-tighter text-white group-hover:text-volt transition-colors">{name}</h3>"#,
            r#"</div><div class="text-right">"#,
            r#"<span class="class-time block text-xl font-black text-white">{time}</span>"#,
            r#"<span class="block text-[10px] text-muted uppercase font-bold">{duration} MIN</span>"#,
            r#"</div></div>"#,
            r#"<div class="flex items-center gap-3 mb-6"><div>"#,
            r#"<span class="block text-[10px] text-muted uppercase font-bold">Trainer</span>"#,
            r#"<span class="class-trainer block text-xs text-white font-bold">{trainer}</span>"#,
            r#"</div></div>"#,
            r#"<div class="flex items-center justify-between pt-4 border-t border-white/5">"#,
            r#"<div class="flex items-center gap-2"><div class="w-2 h-2 rounded-full {dot}"></div>"#,
            r#"<span class="text-[10px] text-muted uppercase font-black tracking-widest">{intensity} Intensity</span></div>"#,
            r#"<span class="class-spots text-[10px] font-black uppercase tracking-widest {spots_class}">{spots} Spots Left</span>"#,
            r#"</div>"#,
            r##"<a href="#" class="absolute inset-0 z-10" aria-label="Book {name}"></a>"##,
            r#"</div>"#,
        ),
        slug = escape_html(&c.slug),
        kind = c.session_type,
        name = name,
        time = escape_html(&c.time),
        duration = c.duration,
        trainer = escape_html(entry.trainer_name),
        dot = intensity_dot(c.intensity),
        intensity = c.intensity,
        spots_class = spots_class,
        spots = c.spots_left,
    ));
}

fn intensity_dot(intensity: Intensity) -> &'static str {
    match intensity {
        Intensity::Extreme => "bg-signal",
        Intensity::High => "bg-volt",
        Intensity::Moderate => "bg-flux",
        Intensity::Low => "bg-sky-400",
    }
}

/// Query string selecting `selections`, with wildcard dimensions left out.
pub fn selection_query(selections: &Selections) -> String {
    let mut query = form_urlencoded::Serializer::new(String::new());
    if let Selection::Only(day) = selections.day {
        query.append_pair("day", day.as_str());
    }
    if let Selection::Only(session_type) = selections.session_type {
        query.append_pair("type", session_type.as_str());
    }
    if let Selection::Only(intensity) = selections.intensity {
        query.append_pair("intensity", intensity.as_str());
    }
    query.finish()
}

fn option_href(action: &str, selections: &Selections) -> String {
    let query = selection_query(selections);
    if query.is_empty() {
        action.to_string()
    } else {
        format!("{action}?{query}")
    }
}

fn render_group<T: Copy + PartialEq + std::fmt::Display>(
    html: &mut String,
    label: &str,
    active_class: &str,
    current: Selection<T>,
    options: &[Selection<T>],
    href: impl Fn(Selection<T>) -> String,
) {
    html.push_str(&format!(
        r#"<div class="filter-group flex flex-col gap-3 min-w-[150px]"><label class="text-[10px] font-black uppercase tracking-widest text-muted">{label}</label><div class="flex flex-wrap gap-2">"#
    ));
    for &option in options {
        let (state, aria) = if option == current {
            (active_class, "true")
        } else {
            (BUTTON_IDLE, "false")
        };
        html.push_str(&format!(
            r#"<a href="{href}" class="filter-option {BUTTON_BASE} {state}" aria-pressed="{aria}">{option}</a>"#,
            href = escape_html(&href(option)),
        ));
    }
    html.push_str("</div></div>");
}

/// The filter bar plus results grid for the current state of `filter`.
/// `action` is the path the filter links point back to.
pub fn render_schedule(
    filter: &ScheduleFilter<'_>,
    container: &mut ResultsContainer<'_>,
    action: &str,
) -> String {
    let selections = filter.selections();
    let mut html = String::from(r#"<div class="schedule-system flex flex-col gap-8">"#);
    html.push_str(
        r#"<div class="flex flex-wrap gap-4 p-6 glass-dark border border-white/5 rounded-sm">"#,
    );
    render_group(
        &mut html,
        "Select Day",
        "bg-volt text-void border-volt",
        selections.day,
        &Selection::domain(&Day::ALL),
        |day| option_href(action, &Selections { day, ..selections }),
    );
    render_group(
        &mut html,
        "Session Type",
        "bg-flux text-void border-flux",
        selections.session_type,
        &Selection::domain(&SessionType::ALL),
        |session_type| {
            option_href(
                action,
                &Selections {
                    session_type,
                    ..selections
                },
            )
        },
    );
    render_group(
        &mut html,
        "Intensity Level",
        "bg-white text-void border-white",
        selections.intensity,
        &Selection::domain(&Intensity::ALL),
        |intensity| {
            option_href(
                action,
                &Selections {
                    intensity,
                    ..selections
                },
            )
        },
    );
    html.push_str("</div>");
    html.push_str(&container.render(&filter.entries()));
    html.push_str("</div>");
    html
}

pub fn render_page(title: &str, body: &str) -> String {
    format!(
        r#"<!doctype html><html lang="en"><head><meta charset="utf-8"><meta name="viewport" content="width=device-width, initial-scale=1"><title>{title}</title></head><body class="bg-void text-white"><main class="container mx-auto px-4 py-16">{body}</main></body></html>"#,
        title = escape_html(title),
    )
}

pub fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use scraper::{Html, Selector};

    use super::*;
    use crate::models::{ClassSession, Trainer};

    struct CountingHook {
        calls: Cell<usize>,
    }

    impl TransitionHook for CountingHook {
        fn setup(&self, container_id: &str) -> String {
            self.calls.set(self.calls.get() + 1);
            format!("<!-- setup {container_id} -->")
        }
    }

    fn session(id: &str, day: Day, spots: i32) -> ClassSession {
        ClassSession {
            id: id.to_string(),
            name: format!("Session <{id}>"),
            trainer_id: "alex".to_string(),
            day,
            time: "06:00".to_string(),
            duration: 45,
            session_type: SessionType::Boxing,
            intensity: Intensity::Extreme,
            spots_left: spots,
            slug: id.to_string(),
        }
    }

    fn trainers() -> Vec<Trainer> {
        vec![Trainer {
            id: "alex".into(),
            name: "Alex Vane".into(),
            role: "Coach".into(),
            bio: String::new(),
            specialties: vec![],
            image: String::new(),
        }]
    }

    fn select<'a>(doc: &'a Html, css: &str) -> Vec<scraper::ElementRef<'a>> {
        let selector = Selector::parse(css).unwrap();
        doc.select(&selector).collect()
    }

    #[test]
    fn test_transition_setup_runs_once_per_container() {
        let hook = CountingHook { calls: Cell::new(0) };
        let mut container = ResultsContainer::new("results", &hook);

        let first = container.render(&[]);
        let second = container.render(&[]);
        assert_eq!(hook.calls.get(), 1);
        assert!(first.contains("<!-- setup results -->"));
        assert!(!second.contains("setup"));

        let mut other = ResultsContainer::new("other", &hook);
        other.render(&[]);
        assert_eq!(hook.calls.get(), 2);
    }

    #[test]
    fn test_auto_animate_script_keeps_src_verbatim() {
        let hook = AutoAnimate::new("https://cdn.example/auto-animate.mjs?v=0.8.2&min=1");
        let doc = Html::parse_fragment(&hook.setup("schedule-results"));
        let script = select(&doc, "script");
        assert_eq!(script.len(), 1);
        let text: String = script[0].text().collect();
        assert!(text.contains(
            r#"import autoAnimate from "https://cdn.example/auto-animate.mjs?v=0.8.2&min=1";"#
        ));
        assert!(text.contains(r#"document.getElementById("schedule-results")"#));
    }

    #[test]
    fn test_auto_animate_script_cannot_be_closed_early() {
        let hook = AutoAnimate::new(r#"x"</script><b>"#);
        let html = hook.setup("results");
        assert_eq!(html.matches("</script>").count(), 1);
        assert!(html.contains(r#"from "x\"<\/script><b>";"#));
    }

    #[test]
    fn test_empty_view_renders_placeholder() {
        let classes = vec![session("a", Day::Monday, 3)];
        let trainers = trainers();
        let mut filter = ScheduleFilter::new(&classes, &trainers);
        filter.set_day(Selection::Only(Day::Tuesday));
        let hook = AutoAnimate::new("https://cdn.example/auto-animate.mjs");
        let mut container = ResultsContainer::new(RESULTS_CONTAINER_ID, &hook);

        let doc = Html::parse_fragment(&render_schedule(&filter, &mut container, "/schedule"));
        assert_eq!(select(&doc, ".class-card").len(), 0);
        let empty = select(&doc, ".schedule-empty p");
        assert_eq!(empty.len(), 1);
        assert_eq!(empty[0].text().collect::<String>(), EMPTY_PLACEHOLDER);
    }

    #[test]
    fn test_cards_show_trainer_and_escape_text() {
        let classes = vec![session("a", Day::Monday, 3), session("b", Day::Friday, 9)];
        let trainers = trainers();
        let filter = ScheduleFilter::new(&classes, &trainers);
        let hook = AutoAnimate::new("https://cdn.example/auto-animate.mjs");
        let mut container = ResultsContainer::new(RESULTS_CONTAINER_ID, &hook);

        let html = render_schedule(&filter, &mut container, "/schedule");
        assert!(html.contains("Session &lt;a&gt;"));
        assert!(html.contains(r#"import autoAnimate from "https://cdn.example/auto-animate.mjs""#));

        let doc = Html::parse_fragment(&html);
        let cards = select(&doc, ".class-card");
        assert_eq!(cards.len(), 2);
        assert_eq!(cards[0].value().attr("data-slug"), Some("a"));
        let trainers = select(&doc, ".class-trainer");
        assert_eq!(trainers[0].text().collect::<String>(), "Alex Vane");
        let spots = select(&doc, ".class-spots");
        assert!(spots[0].value().attr("class").unwrap().contains("text-signal"));
        assert!(spots[1].value().attr("class").unwrap().contains("text-flux"));
        let book = select(&doc, r#"a[aria-label="Book Session <b>"]"#);
        assert_eq!(book.len(), 1);
        assert_eq!(book[0].value().attr("href"), Some("#"));
    }

    #[test]
    fn test_filter_links_keep_other_dimensions() {
        let classes = vec![session("a", Day::Monday, 3)];
        let trainers = trainers();
        let mut filter = ScheduleFilter::new(&classes, &trainers);
        filter.set_type(Selection::Only(SessionType::Boxing));
        let hook = AutoAnimate::new("x");
        let mut container = ResultsContainer::new(RESULTS_CONTAINER_ID, &hook);

        let doc = Html::parse_fragment(&render_schedule(&filter, &mut container, "/schedule"));
        let options = select(&doc, "a.filter-option");
        assert_eq!(options.len(), 8 + 6 + 5);

        let monday = options
            .iter()
            .find(|a| a.text().collect::<String>() == "Monday")
            .unwrap();
        assert_eq!(monday.value().attr("href"), Some("/schedule?day=Monday&type=Boxing"));

        let pressed: Vec<String> = options
            .iter()
            .filter(|a| a.value().attr("aria-pressed") == Some("true"))
            .map(|a| a.text().collect())
            .collect();
        assert_eq!(pressed, vec!["All", "Boxing", "All"]);
    }

    #[test]
    fn test_selection_query() {
        assert_eq!(selection_query(&Selections::default()), "");
        let selections = Selections {
            day: Selection::Only(Day::Sunday),
            session_type: Selection::All,
            intensity: Selection::Only(Intensity::Low),
        };
        assert_eq!(selection_query(&selections), "day=Sunday&intensity=Low");
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(escape_html(r#"<a href="x">&'"#), "&lt;a href=&quot;x&quot;&gt;&amp;&#39;");
    }
}
