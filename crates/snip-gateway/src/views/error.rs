use super::{escape, layout};

pub fn page(title: &str, message: &str) -> String {
    let body = format!(
        "<div class=\"card narrow center\">\n<h1>{}</h1>\n<p class=\"muted\">{}</p>\n\
         <a class=\"button\" href=\"/\">Back to Home</a>\n</div>",
        escape(title),
        escape(message)
    );
    layout(title, &body)
}

pub fn not_found() -> String {
    page("Link not found", "The short link you followed does not exist.")
}

pub fn access_required() -> String {
    let body = "<div class=\"card narrow center\">\n\
         <h1>Dashboard Access Required</h1>\n\
         <p class=\"muted\">Please provide the access code to view the dashboard.</p>\n\
         <p>Add <code>?accesscode=YOUR_CODE</code> to the URL.</p>\n\
         <p>The code is set with the <code>DASHBOARD_ACCESS_CODE</code> environment variable.</p>\n\
         <a class=\"button\" href=\"/\">Back to Home</a>\n</div>";
    layout("Dashboard Access Required", body)
}
