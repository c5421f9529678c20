use super::{attr, layout, text, timestamp};
use crate::models::{ActiveContext, Category};

pub fn categories_index(context: &ActiveContext, categories: &[Category]) -> String {
    let mut body = String::from(concat!(
        "<a class=\"btn btn-primary\" href=\"/categories/create\">New Category</a>\n",
        "<br /><br />\n<table class=\"table\">\n<thead>\n<tr>\n",
        "<th>Name</th>\n<th>Created at</th>\n<th></th>\n</tr>\n</thead>\n<tbody>\n"
    ));
    if categories.is_empty() {
        body.push_str("<tr><td colspan=\"3\" class=\"text-center\">No categories found.</td></tr>\n");
    }
    for category in categories {
        body.push_str(&format!(
            concat!(
                "<tr>\n<td>{name}</td>\n<td>{created_at}</td>\n<td>\n",
                "<a href=\"/categories/{id}/edit\" class=\"btn btn-sm btn-info\">Edit</a>\n",
                "<form action=\"/categories/{id}?_method=DELETE\" method=\"POST\" style=\"display: inline\">\n",
                "<input type=\"submit\" class=\"btn btn-sm btn-danger\" value=\"Delete\" ",
                "onclick=\"return confirm('Are you sure?')\" />\n",
                "</form>\n</td>\n</tr>\n"
            ),
            name = text(&category.name),
            created_at = timestamp(&category.created_at),
            id = category.id,
        ));
    }
    body.push_str("</tbody>\n</table>");
    layout("Categories", Some(context), &body)
}

pub fn category_form(context: &ActiveContext, category: Option<&Category>) -> String {
    let (title, action, submit) = match category {
        Some(category) => (
            "Edit Category",
            format!("/categories/{}?_method=PUT", category.id),
            " Update Category ",
        ),
        None => ("New Category", "/categories".to_owned(), " Save Category "),
    };
    let body = format!(
        concat!(
            "<form action=\"{action}\" method=\"POST\">\n",
            "Name:\n<br />\n",
            "<input type=\"text\" name=\"name\" class=\"form-control\" value=\"{name}\" />\n<br />\n",
            "<input type=\"submit\" value=\"{submit}\" class=\"btn btn-primary\" />\n",
            "</form>"
        ),
        action = action,
        name = attr(category.map(|c| c.name.as_str()).unwrap_or("")),
        submit = submit,
    );
    layout(title, Some(context), &body)
}
