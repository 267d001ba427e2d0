//! HTML fragments and page shells emitted by the serializer.
//!
//! These are deliberately plain string builders: the page structure is
//! small and fixed, and keeping it in Rust avoids a template-engine
//! dependency and runtime template parsing.

use std::collections::HashMap;
use std::fmt::Write;

/// One breadcrumb entry; the last entry of a trail carries no URL.
#[derive(Debug, Clone)]
pub struct Breadcrumb {
    pub name: String,
    pub url: Option<String>,
}

/// A link to a rendered section, used for child listings and prev/next
/// navigation.
#[derive(Debug, Clone)]
pub struct SectionLink {
    pub url: String,
    pub title: String,
}

/// One entry of the tag index listing.
#[derive(Debug)]
pub struct TagLink {
    pub url: String,
    pub name: String,
    pub icon: String,
}

/// Shared page chrome parameters.
pub struct PageShell<'a> {
    pub main_title: &'a str,
    pub section_title: &'a str,
    pub language: &'a str,
    pub base_url: &'a str,
    pub head_suffix: &'a str,
    pub colors: &'a HashMap<String, String>,
}

/// Escape text for safe interpolation into HTML element content.
pub fn escape_html(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

fn color_style(colors: &HashMap<String, String>) -> String {
    let mut entries: Vec<(&String, &String)> = colors.iter().collect();
    entries.sort();
    let mut style = String::from(":root {");
    for (role, value) in entries {
        let _ = write!(style, " --color-{role}: {value};");
    }
    style.push_str(" }");
    style
}

fn breadcrumb_trail(breadcrumbs: &[Breadcrumb]) -> String {
    let mut html = String::from("<nav class=\"breadcrumbs\">");
    for (position, breadcrumb) in breadcrumbs.iter().enumerate() {
        if position > 0 {
            html.push_str(" / ");
        }
        match &breadcrumb.url {
            Some(url) => {
                let _ = write!(html, "<a href=\"{url}\">{}</a>", breadcrumb.name);
            }
            None => {
                let _ = write!(html, "<span>{}</span>", breadcrumb.name);
            }
        }
    }
    html.push_str("</nav>");
    html
}

fn page(shell: &PageShell<'_>, breadcrumbs: &[Breadcrumb], body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="{language}">
<head>
<meta charset="utf-8" />
<meta name="viewport" content="width=device-width, initial-scale=1" />
<title>{section_title} - {main_title}</title>
<link rel="stylesheet" href="{base_url}assets/styles.css" />
<style>{colors}</style>
{head_suffix}</head>
<body>
<header><h1><a href="{base_url}">{main_title}</a></h1></header>
{breadcrumbs}
<main>
{body}
</main>
</body>
</html>
"#,
        language = shell.language,
        section_title = shell.section_title,
        main_title = shell.main_title,
        base_url = shell.base_url,
        colors = color_style(shell.colors),
        head_suffix = shell.head_suffix,
        breadcrumbs = breadcrumb_trail(breadcrumbs),
    )
}

/// Navigation page of a non-leaf section: its title plus child links.
pub fn index_page(
    shell: &PageShell<'_>,
    breadcrumbs: &[Breadcrumb],
    children: &[SectionLink],
) -> String {
    let mut body = format!("<h2>{}</h2>\n<ul class=\"section-list\">\n", shell.section_title);
    for child in children {
        let _ = writeln!(
            body,
            "<li><a href=\"{}\">{}</a></li>",
            child.url, child.title
        );
    }
    body.push_str("</ul>");
    page(shell, breadcrumbs, &body)
}

/// Content page of a leaf section: paragraphs, appendices, prev/next.
pub fn section_page(
    shell: &PageShell<'_>,
    breadcrumbs: &[Breadcrumb],
    paragraphs: &[String],
    appendices: &[String],
    previous: Option<&SectionLink>,
    next: Option<&SectionLink>,
) -> String {
    let mut body = format!("<h2>{}</h2>\n", shell.section_title);
    for paragraph in paragraphs {
        let _ = writeln!(body, "<p>{paragraph}</p>");
    }
    for appendix in appendices {
        body.push_str(appendix);
        body.push('\n');
    }
    body.push_str("<nav class=\"pagination\">");
    if let Some(previous) = previous {
        let _ = write!(
            body,
            "<a class=\"previous\" href=\"{}\">&larr; {}</a>",
            previous.url, previous.title
        );
    }
    if let Some(next) = next {
        let _ = write!(
            body,
            "<a class=\"next\" href=\"{}\">{} &rarr;</a>",
            next.url, next.title
        );
    }
    body.push_str("</nav>");
    page(shell, breadcrumbs, &body)
}

/// Wrap appendix contents in the shared appendix chrome, with an
/// optional heading.
pub fn appendix_wrapper(name: Option<&str>, contents: &str) -> String {
    match name {
        Some(name) => {
            format!("<div class=\"appendix\"><h3>{name}</h3>{contents}</div>")
        }
        None => format!("<div class=\"appendix\">{contents}</div>"),
    }
}

/// An item or fluid display, optionally slot-styled and hyperlinked.
pub fn item_display(
    slot: bool,
    icon_url: &str,
    name: &str,
    count: u32,
    annotation: &str,
    link: Option<&str>,
) -> String {
    let class = if slot { "item item-slot" } else { "item" };
    let count = if count > 1 {
        format!("<span class=\"count\">{count}</span>")
    } else {
        String::new()
    };
    let annotation = if annotation.is_empty() {
        String::new()
    } else {
        format!("<span class=\"annotation\">{annotation}</span>")
    };
    let image = format!("<img src=\"{icon_url}\" alt=\"{name}\" title=\"{name}\" />");
    match link {
        Some(url) => format!(
            "<div class=\"{class}\"><a href=\"{url}\">{image}</a>{count}{annotation}</div>"
        ),
        None => format!("<div class=\"{class}\">{image}{count}{annotation}</div>"),
    }
}

/// The empty-slot placeholder.
pub fn empty_item(slot: bool) -> String {
    if slot {
        "<div class=\"item item-slot\">&nbsp;</div>".to_owned()
    } else {
        "<div class=\"item\">&nbsp;</div>".to_owned()
    }
}

/// A 3x3 crafting grid with its output slot. `cells` holds exactly nine
/// rendered cell fragments in row-major order.
pub fn crafting_recipe(cells: &[String], output: &str) -> String {
    let mut html = String::from("<div class=\"recipe recipe-crafting\"><div class=\"grid\">");
    for row in cells.chunks(3) {
        html.push_str("<div class=\"row\">");
        for cell in row {
            let _ = write!(html, "<div class=\"cell\">{cell}</div>");
        }
        html.push_str("</div>");
    }
    let _ = write!(
        html,
        "</div><div class=\"arrow\">&rarr;</div><div class=\"output\">{output}</div></div>"
    );
    html
}

/// A furnace recipe: input slot, furnace icon, output slot.
pub fn furnace_recipe(input: &str, output: &str, icon: &str) -> String {
    format!(
        "<div class=\"recipe recipe-furnace\"><div class=\"input\">{input}</div>\
         <div class=\"furnace\">{icon}</div>\
         <div class=\"arrow\">&rarr;</div><div class=\"output\">{output}</div></div>"
    )
}

/// A keybinding row: action name and its bound key.
pub fn keybinding(name: &str, key: &str) -> String {
    format!("<div class=\"keybinding\">{name}: <kbd>{key}</kbd></div>")
}

/// Advancement requirements with the rewards granted for them.
pub fn advancement_rewards(
    advancements: &[(String, String)],
    rewards: &[String],
    caption: &str,
) -> String {
    let mut html = String::from("<div class=\"advancement-rewards\"><ul class=\"advancements\">");
    for (title, description) in advancements {
        let _ = write!(
            html,
            "<li><span class=\"title\">{title}</span>\
             <span class=\"description\">{description}</span></li>"
        );
    }
    let _ = write!(html, "</ul><p class=\"caption\">{caption}</p><div class=\"rewards\">");
    for reward in rewards {
        html.push_str(reward);
    }
    html.push_str("</div></div>");
    html
}

/// The sorted tag cross-reference listing.
pub fn tag_index(links: &[TagLink]) -> String {
    let mut html = String::from("<ul class=\"tag-index\">");
    for link in links {
        let _ = write!(
            html,
            "<li>{}<a href=\"{}\">{}</a></li>",
            link.icon, link.url, link.name
        );
    }
    html.push_str("</ul>");
    html
}

/// An ad-network fragment for leaf pages.
pub fn ad(client: &str, slot: &str) -> String {
    format!(
        "<div class=\"ad\"><ins class=\"adsbygoogle\" style=\"display:block\" \
         data-ad-client=\"{client}\" data-ad-slot=\"{slot}\" data-ad-format=\"auto\"></ins>\
         <script>(adsbygoogle = window.adsbygoogle || []).push({{}});</script></div>"
    )
}

/// An embedded image at twice its declared size, drawn from the shared
/// 512x512 texture convention.
pub fn image(url: &str, width: u32, height: u32) -> String {
    format!(
        "<canvas class=\"appendix-image\" style=\"background: url({url}); \
         width: {}px; height: {}px; background-size: 512px 512px;\"></canvas>",
        width * 2,
        height * 2
    )
}

/// A free-form text block, scaled relative to the base font size.
pub fn textfield(contents: &str, scale: f32) -> String {
    format!("<div class=\"textfield\" style=\"font-size: {scale}em\">{contents}</div>")
}
