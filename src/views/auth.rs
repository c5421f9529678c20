use super::{layout, text};

pub fn login_page(error: Option<&str>) -> String {
    let error = match error {
        Some(error) => format!("<div class=\"alert alert-danger\">{}</div>\n", text(error)),
        None => String::new(),
    };
    let body = format!(
        concat!(
            "{error}<form action=\"/login\" method=\"POST\">\n",
            "E-Mail:\n<br />\n<input type=\"email\" name=\"email\" class=\"form-control\" />\n<br />\n",
            "Password:\n<br />\n<input type=\"password\" name=\"password\" class=\"form-control\" />\n<br />\n",
            "<input type=\"submit\" value=\" Login \" class=\"btn btn-primary\" />\n",
            "</form>"
        ),
        error = error,
    );
    layout("Login", None, &body)
}

/// `organization_id` carries an invitation through the form.
pub fn register_page(organization_id: Option<i32>) -> String {
    let invitation = match organization_id {
        Some(id) => format!(
            "<input type=\"hidden\" name=\"organization_id\" value=\"{}\" />\n",
            id
        ),
        None => String::new(),
    };
    let body = format!(
        concat!(
            "<form action=\"/register\" method=\"POST\">\n{invitation}",
            "Name:\n<br />\n<input type=\"text\" name=\"name\" class=\"form-control\" />\n<br />\n",
            "E-Mail:\n<br />\n<input type=\"email\" name=\"email\" class=\"form-control\" />\n<br />\n",
            "Password:\n<br />\n<input type=\"password\" name=\"password\" class=\"form-control\" />\n<br />\n",
            "<input type=\"submit\" value=\" Register \" class=\"btn btn-primary\" />\n",
            "</form>"
        ),
        invitation = invitation,
    );
    layout("Register", None, &body)
}
