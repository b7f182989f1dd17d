use super::{encode_query_value, escape, layout};
use snip_core::Link;

pub enum Banner<'a> {
    Error(&'a str),
    Notice(&'a str),
}

pub struct DashboardView<'a> {
    pub links: &'a [Link],
    /// Access code echoed into every form action.
    pub access_code: &'a str,
    pub banner: Option<Banner<'a>>,
}

pub fn render(view: &DashboardView<'_>) -> String {
    let action = format!(
        "/dashboard?accesscode={}",
        escape(&encode_query_value(view.access_code))
    );

    let mut body = String::from(
        "<div class=\"card\">\n<h1>Dashboard</h1>\n\
         <p class=\"muted\">Manage and track your short links</p>\n\
         <a class=\"button\" href=\"/\">Create New Link</a>\n",
    );

    match &view.banner {
        Some(Banner::Error(message)) => {
            body.push_str(&format!("<div class=\"error\">{}</div>\n", escape(message)))
        }
        Some(Banner::Notice(message)) => {
            body.push_str(&format!("<div class=\"notice\">{}</div>\n", escape(message)))
        }
        None => {}
    }
    body.push_str("</div>\n");

    if view.links.is_empty() {
        body.push_str(
            "<div class=\"card center\">\n<h2>No links yet</h2>\n\
             <p class=\"muted\">Short links you create will show up here.</p>\n</div>",
        );
        return layout("Short Link Dashboard", &body);
    }

    body.push_str(
        "<div class=\"card\">\n<table>\n<thead><tr><th>Short Link</th><th>Original URL</th>\
         <th>Clicks</th><th>Created</th><th>Actions</th></tr></thead>\n<tbody>\n",
    );
    for link in view.links {
        body.push_str(&row(link, &action));
    }
    body.push_str(&format!(
        "</tbody>\n</table>\n<p class=\"muted\">Showing <strong>{}</strong> short links</p>\n</div>",
        view.links.len()
    ));

    layout("Short Link Dashboard", &body)
}

fn row(link: &Link, action: &str) -> String {
    let id = escape(link.id.as_str());
    let url = escape(&link.original_url);

    format!(
        "<tr>\n\
         <td><a href=\"/s/{id}\" target=\"_blank\" rel=\"noopener noreferrer\">/s/{id}</a>\n\
         <details><summary>Edit id</summary>\n\
         <form method=\"post\" action=\"{action}\">\n\
         <input type=\"hidden\" name=\"action\" value=\"updateId\">\n\
         <input type=\"hidden\" name=\"id\" value=\"{id}\">\n\
         <input type=\"text\" name=\"newId\" value=\"{id}\" required pattern=\"[A-Za-z0-9_\\-]+\">\n\
         <button type=\"submit\">Save</button>\n</form></details></td>\n\
         <td><a class=\"break\" href=\"{url}\" target=\"_blank\" rel=\"noopener noreferrer\">{url}</a>\n\
         <details><summary>Edit URL</summary>\n\
         <form method=\"post\" action=\"{action}\">\n\
         <input type=\"hidden\" name=\"action\" value=\"updateUrl\">\n\
         <input type=\"hidden\" name=\"id\" value=\"{id}\">\n\
         <input type=\"url\" name=\"newUrl\" value=\"{url}\" required>\n\
         <button type=\"submit\">Save</button>\n</form></details></td>\n\
         <td class=\"clicks\">{clicks}</td>\n\
         <td>{created}</td>\n\
         <td><form method=\"post\" action=\"{action}\" \
         onsubmit=\"return confirm('Are you sure you want to delete this link? This action cannot be undone.');\">\n\
         <input type=\"hidden\" name=\"action\" value=\"delete\">\n\
         <input type=\"hidden\" name=\"id\" value=\"{id}\">\n\
         <button class=\"danger\" type=\"submit\">Delete</button>\n</form></td>\n\
         </tr>\n",
        clicks = link.clicks,
        created = link.created_at.strftime("%Y-%m-%d"),
    )
}
