use super::{attr, layout, text, timestamp};
use crate::models::{ActiveContext, Article, Capability, Category};

pub fn articles_index(context: &ActiveContext, rows: &[(Article, String)]) -> String {
    let see_user = context.can(Capability::SeeArticleUser);
    let columns = if see_user { 4 } else { 3 };
    let mut body = String::from(concat!(
        "<a class=\"btn btn-primary\" href=\"/articles/create\">New Article</a>\n",
        "<br /><br />\n<table class=\"table\">\n<thead>\n<tr>\n<th>Title</th>\n"
    ));
    if see_user {
        body.push_str("<th>User</th>\n");
    }
    body.push_str("<th>Created at</th>\n<th></th>\n</tr>\n</thead>\n<tbody>\n");
    if rows.is_empty() {
        body.push_str(&format!(
            "<tr><td colspan=\"{}\" class=\"text-center\">No articles found.</td></tr>\n",
            columns
        ));
    }
    for (article, owner_name) in rows {
        body.push_str("<tr>\n");
        body.push_str(&format!("<td>{}</td>\n", text(&article.title)));
        if see_user {
            body.push_str(&format!("<td>{}</td>\n", text(owner_name)));
        }
        body.push_str(&format!(
            concat!(
                "<td>{created_at}</td>\n<td>\n",
                "<a href=\"/articles/{id}/edit\" class=\"btn btn-sm btn-info\">Edit</a>\n",
                "<form action=\"/articles/{id}?_method=DELETE\" method=\"POST\" style=\"display: inline\">\n",
                "<input type=\"submit\" class=\"btn btn-sm btn-danger\" value=\"Delete\" ",
                "onclick=\"return confirm('Are you sure?')\" />\n",
                "</form>\n</td>\n</tr>\n"
            ),
            created_at = timestamp(&article.created_at),
            id = article.id,
        ));
    }
    body.push_str("</tbody>\n</table>");
    layout("Articles", Some(context), &body)
}

/// Create form when `article` is `None`, edit form otherwise.
pub fn article_form(
    context: &ActiveContext,
    article: Option<&Article>,
    categories: &[Category],
) -> String {
    let (title, action, submit) = match article {
        Some(article) => (
            "Edit Article",
            format!("/articles/{}?_method=PUT", article.id),
            " Update Article ",
        ),
        None => ("New Article", "/articles".to_owned(), " Save Article "),
    };
    let selected_category = article.and_then(|a| a.category_id);
    let mut options = String::new();
    for category in categories {
        let selected = if Some(category.id) == selected_category {
            " selected"
        } else {
            ""
        };
        options.push_str(&format!(
            "<option value=\"{}\"{}>{}</option>\n",
            category.id,
            selected,
            text(&category.name)
        ));
    }
    let publish = if context.can(Capability::PublishArticles) {
        let checked = match article {
            Some(article) if article.published_at.is_some() => " checked",
            _ => "",
        };
        format!(
            "<input type=\"checkbox\" name=\"published\" value=\"1\"{} /> Published\n<br /><br />\n",
            checked
        )
    } else {
        String::new()
    };
    let body = format!(
        concat!(
            "<form action=\"{action}\" method=\"POST\">\n",
            "Title:\n<br />\n",
            "<input type=\"text\" name=\"title\" class=\"form-control\" value=\"{title_value}\" />\n<br />\n",
            "Full text:\n<br />\n",
            "<textarea class=\"form-control\" rows=\"10\" name=\"full_text\">{full_text}</textarea>\n<br />\n",
            "Category:\n<br />\n",
            "<select class=\"form-control\" name=\"category_id\">\n",
            "<option value=\"\">-</option>\n{options}</select>\n<br />\n",
            "{publish}",
            "<input type=\"submit\" value=\"{submit}\" class=\"btn btn-primary\" />\n",
            "</form>"
        ),
        action = action,
        title_value = attr(article.map(|a| a.title.as_str()).unwrap_or("")),
        full_text = text(article.map(|a| a.full_text.as_str()).unwrap_or("")),
        options = options,
        publish = publish,
        submit = submit,
    );
    layout(title, Some(context), &body)
}
