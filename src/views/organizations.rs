use super::{layout, text};
use crate::models::{ActiveContext, Membership, Role, User};

pub fn join_page(context: &ActiveContext, organization: &User) -> String {
    let options: String = Role::ALL
        .iter()
        .filter(|role| role.joinable())
        .map(|role| format!("<option value=\"{}\">{}</option>\n", role.id(), role.name()))
        .collect();
    let body = format!(
        concat!(
            "<form action=\"/join\" method=\"POST\">\n",
            "<input type=\"hidden\" name=\"organization_id\" value=\"{id}\" />\n",
            "Do you want to join organization <b>{name}</b>?\n<br />\n",
            "Role:\n<br />\n<select class=\"form-control\" name=\"role_id\">\n{options}</select>\n<br />\n",
            "<input type=\"submit\" value=\" Yes, Join \" class=\"btn btn-primary\" />\n",
            "</form>"
        ),
        id = organization.id,
        name = text(&organization.name),
        options = options,
    );
    layout("Join the Organization", Some(context), &body)
}

pub fn invite_page(context: &ActiveContext, app_url: &str) -> String {
    let body = format!(
        concat!(
            "Link for new users:\n<br />\n",
            "{url}/register?organization_id={id}\n",
            "<br /><br />\n",
            "Link for existing users:\n<br />\n",
            "{url}/join?organization_id={id}"
        ),
        url = text(app_url),
        id = context.organization_id,
    );
    layout("Invite a Teammate", Some(context), &body)
}

pub fn home_page(context: &ActiveContext, user: &User, organizations: &[(Membership, User)]) -> String {
    let workspace = match &context.organization_name {
        Some(name) if context.organization_id != user.id => {
            format!("Working in organization <b>{}</b>", text(name))
        }
        _ => "Working in your personal workspace".to_owned(),
    };
    let mut body = format!(
        "<p>Hello, {}. {} as {}.</p>\n<ul>\n",
        text(&user.name),
        workspace,
        context.role
    );
    if context.organization_id != user.id {
        body.push_str(&format!(
            "<li><a href=\"/organization/{}\">Personal workspace</a></li>\n",
            user.id
        ));
    }
    for (membership, organization) in organizations {
        let role = membership
            .role()
            .map(|role| role.name())
            .unwrap_or("unknown");
        if organization.id == context.organization_id {
            body.push_str(&format!(
                "<li><b>{}</b> ({})</li>\n",
                text(&organization.name),
                role
            ));
        } else {
            body.push_str(&format!(
                "<li><a href=\"/organization/{}\">{}</a> ({})</li>\n",
                organization.id,
                text(&organization.name),
                role
            ));
        }
    }
    body.push_str("</ul>");
    layout("Dashboard", Some(context), &body)
}
