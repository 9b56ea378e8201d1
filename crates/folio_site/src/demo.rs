//! Demo portfolio page
//!
//! The full markup every controller expects, laid out on a 1280×800
//! viewport. Used by the CLI's `run` command and by the integration tests.

use folio_core::{ElementId, Page};

pub const VIEWPORT_WIDTH: f32 = 1280.0;
pub const VIEWPORT_HEIGHT: f32 = 800.0;
pub const DOCUMENT_HEIGHT: f32 = 6000.0;

/// Section ids in document order with their `(top, height)`
pub const SECTIONS: [(&str, f32, f32); 6] = [
    ("home", 0.0, 800.0),
    ("about", 800.0, 900.0),
    ("skills", 1700.0, 1000.0),
    ("projects", 2700.0, 1200.0),
    ("experience", 3900.0, 1000.0),
    ("contact", 4900.0, 1000.0),
];

const SKILLS: [(&str, &[(&str, u32)]); 3] = [
    ("Frontend", &[("TypeScript", 90), ("React", 85), ("CSS", 80)]),
    ("Backend", &[("Rust", 85), ("PostgreSQL", 75), ("Node.js", 80)]),
    ("Tooling", &[("Git", 90), ("Docker", 70)]),
];

const PROJECTS: [(&str, &str); 6] = [
    ("Storefront Rewrite", "web"),
    ("Trail Tracker", "mobile"),
    ("Analytics Dashboard", "web"),
    ("Brand Refresh", "design"),
    ("Habit Coach", "mobile"),
    ("Docs Portal", "web"),
];

const TIMELINE: [(&str, &str); 3] = [
    ("Senior Software Engineer", "Northwind Labs · 2021 to present"),
    ("Software Engineer", "Blue Harbor Digital · 2018 to 2021"),
    ("Intern", "Cobalt Systems · 2017"),
];

pub fn build_demo_page() -> Page {
    let mut page = Page::new(VIEWPORT_WIDTH, VIEWPORT_HEIGHT);
    page.set_document_height(DOCUMENT_HEIGHT);
    let body = page.body();

    build_navbar(&mut page, body);

    let sections: Vec<ElementId> = SECTIONS
        .iter()
        .map(|(id, top, height)| {
            page.append(body, "section")
                .id(id)
                .class(if *id == "home" { "hero" } else { "section" })
                .rect(*top, *height)
                .finish()
        })
        .collect();

    build_hero(&mut page, sections[0]);
    build_about(&mut page, sections[1], SECTIONS[1].1);
    build_skills(&mut page, sections[2], SECTIONS[2].1);
    build_projects(&mut page, sections[3], SECTIONS[3].1);
    build_experience(&mut page, sections[4], SECTIONS[4].1);
    build_contact(&mut page, sections[5], SECTIONS[5].1);

    page.append(body, "footer")
        .class("footer")
        .rect(5900.0, 100.0)
        .text("© Alex Morgan")
        .finish();
    page
}

fn build_navbar(page: &mut Page, body: ElementId) {
    let navbar = page
        .append(body, "nav")
        .id("navbar")
        .class("navbar")
        .rect(0.0, 70.0)
        .finish();
    page.append(navbar, "a")
        .class("nav-logo")
        .attr("href", "#home")
        .text("AM")
        .finish();
    let menu = page
        .append(navbar, "ul")
        .id("nav-menu")
        .class("nav-menu")
        .finish();
    for (id, _, _) in SECTIONS {
        let item = page.append(menu, "li").class("nav-item").finish();
        let label = capitalize(id);
        page.append(item, "a")
            .class("nav-link")
            .attr("href", &format!("#{id}"))
            .text(&label)
            .finish();
    }
    page.append(navbar, "button")
        .id("theme-toggle")
        .class("theme-toggle")
        .attr("aria-label", "Toggle theme")
        .finish();
    let hamburger = page
        .append(navbar, "button")
        .id("hamburger")
        .class("hamburger")
        .attr("aria-label", "Open menu")
        .finish();
    for _ in 0..3 {
        page.append(hamburger, "span").class("bar").finish();
    }
}

fn build_hero(page: &mut Page, hero: ElementId) {
    let content = page
        .append(hero, "div")
        .class("hero-content")
        .rect(150.0, 500.0)
        .finish();
    let title = page
        .append(content, "h1")
        .class("hero-title")
        .rect(150.0, 80.0)
        .text("Hi, I'm ")
        .finish();
    page.append(title, "span")
        .class("text-highlight")
        .text("Alex Morgan")
        .finish();
    page.append(content, "p")
        .class("hero-subtitle")
        .rect(240.0, 40.0)
        .text("Full-Stack Developer")
        .finish();
    page.append(content, "p")
        .class("hero-tagline")
        .rect(290.0, 30.0)
        .text("I make slow things fast and confusing things clear.")
        .finish();
    page.append(content, "p")
        .class("hero-description")
        .rect(330.0, 90.0)
        .text("Six years of building web applications, APIs and developer tooling.")
        .finish();
    let buttons = page
        .append(content, "div")
        .class("hero-buttons")
        .rect(440.0, 50.0)
        .finish();
    page.append(buttons, "a")
        .class("btn")
        .class("btn--primary")
        .attr("href", "#projects")
        .text("View My Work")
        .finish();
    page.append(buttons, "a")
        .class("btn")
        .class("btn--outline")
        .attr("href", "#contact")
        .text("Get In Touch")
        .finish();
    page.append(buttons, "button")
        .id("download-resume")
        .class("btn")
        .class("btn--secondary")
        .attr("type", "button")
        .text("Download Résumé")
        .finish();
}

fn section_header(page: &mut Page, section: ElementId, top: f32, title: &str) {
    let header = page
        .append(section, "div")
        .class("section-header")
        .rect(top + 80.0, 120.0)
        .finish();
    page.append(header, "h2")
        .class("section-title")
        .text(title)
        .finish();
}

fn build_about(page: &mut Page, section: ElementId, top: f32) {
    section_header(page, section, top, "About Me");
    let content = page
        .append(section, "div")
        .class("about-content")
        .rect(top + 220.0, 500.0)
        .finish();
    page.append(content, "p")
        .text("I care about fast pages, clear code and teams that ship.")
        .finish();
    page.append(content, "img")
        .class("lazy")
        .class("about-photo")
        .attr("data-src", "/images/profile.jpg")
        .attr("alt", "Portrait")
        .rect(top + 220.0, 400.0)
        .finish();
}

fn build_skills(page: &mut Page, section: ElementId, top: f32) {
    section_header(page, section, top, "Skills");
    let mut category_top = top + 220.0;
    for (name, skills) in SKILLS {
        let height = 60.0 + skills.len() as f32 * 60.0;
        let category = page
            .append(section, "div")
            .class("skill-category")
            .rect(category_top, height)
            .finish();
        page.append(category, "h3").text(name).finish();
        for (index, (skill, percent)) in skills.iter().enumerate() {
            let item_top = category_top + 60.0 + index as f32 * 60.0;
            let item = page
                .append(category, "div")
                .class("skill-item")
                .rect(item_top, 60.0)
                .finish();
            page.append(item, "span").class("skill-name").text(skill).finish();
            let bar = page
                .append(item, "div")
                .class("skill-bar")
                .rect(item_top + 30.0, 10.0)
                .finish();
            page.append(bar, "div")
                .class("skill-progress")
                .attr("data-progress", &percent.to_string())
                .style("--progress", &format!("{percent}%"))
                .rect(item_top + 30.0, 10.0)
                .finish();
        }
        category_top += height + 20.0;
    }
}

fn build_projects(page: &mut Page, section: ElementId, top: f32) {
    section_header(page, section, top, "Projects");
    let filters = page
        .append(section, "div")
        .class("project-filters")
        .rect(top + 220.0, 50.0)
        .finish();
    for (filter, label) in [
        ("all", "All"),
        ("web", "Web"),
        ("mobile", "Mobile"),
        ("design", "Design"),
    ] {
        let mut button = page
            .append(filters, "button")
            .class("filter-btn")
            .attr("data-filter", filter)
            .text(label);
        if filter == "all" {
            button = button.class("active");
        }
        button.finish();
    }

    let grid = page
        .append(section, "div")
        .class("projects-grid")
        .rect(top + 300.0, 840.0)
        .finish();
    for (index, (title, category)) in PROJECTS.iter().enumerate() {
        let card_top = top + 300.0 + (index / 3) as f32 * 420.0;
        let card = page
            .append(grid, "div")
            .class("project-card")
            .attr("data-category", category)
            .rect(card_top, 400.0)
            .finish();
        page.append(card, "img")
            .class("lazy")
            .attr("data-src", &format!("/images/project-{}.jpg", index + 1))
            .attr("alt", title)
            .rect(card_top, 200.0)
            .finish();
        page.append(card, "h3")
            .class("project-title")
            .text(title)
            .finish();
    }
}

fn build_experience(page: &mut Page, section: ElementId, top: f32) {
    section_header(page, section, top, "Experience");
    let timeline = page
        .append(section, "div")
        .class("timeline")
        .rect(top + 220.0, 740.0)
        .finish();
    for (index, (role, place)) in TIMELINE.iter().enumerate() {
        let item = page
            .append(timeline, "div")
            .class("timeline-item")
            .rect(top + 220.0 + index as f32 * 250.0, 230.0)
            .finish();
        page.append(item, "h3").text(role).finish();
        page.append(item, "p").class("timeline-meta").text(place).finish();
    }
}

fn build_contact(page: &mut Page, section: ElementId, top: f32) {
    section_header(page, section, top, "Get In Touch");
    let content = page
        .append(section, "div")
        .class("contact-content")
        .rect(top + 220.0, 700.0)
        .finish();
    let form = page
        .append(content, "form")
        .id("contact-form")
        .class("contact-form")
        .rect(top + 220.0, 700.0)
        .finish();
    for (name, tag, kind) in [
        ("name", "input", "text"),
        ("email", "input", "email"),
        ("subject", "input", "text"),
        ("message", "textarea", ""),
    ] {
        let group = page.append(form, "div").class("form-group").finish();
        page.append(group, "label")
            .class("form-label")
            .attr("for", name)
            .text(&capitalize(name))
            .finish();
        let mut control = page
            .append(group, tag)
            .id(name)
            .class("form-control")
            .attr("name", name);
        if !kind.is_empty() {
            control = control.attr("type", kind);
        }
        control.finish();
        page.append(group, "div")
            .class("form-error")
            .attr("data-error-for", name)
            .finish();
    }
    page.append(form, "button")
        .class("btn")
        .class("btn--primary")
        .attr("type", "submit")
        .text("Send Message")
        .finish();
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
