use std::sync::Arc;

use handlebars::{Handlebars, handlebars_helper};

pub type Hbs = Arc<Handlebars<'static>>;

handlebars_helper!(usd: |v: f64| format!("${:.2}", v));

pub fn build_handlebars() -> Hbs {
    let mut hb = Handlebars::new();

    hb.register_helper("usd", Box::new(usd));

    // Layout + pages
    hb.register_template_file("layouts/base", "templates/layouts/base.hbs")
        .expect("template layouts/base");

    hb.register_template_file("pages/portfolio", "templates/pages/portfolio.hbs")
        .expect("template pages/portfolio");
    hb.register_template_file("pages/login", "templates/pages/login.hbs")
        .expect("template pages/login");
    hb.register_template_file("pages/register", "templates/pages/register.hbs")
        .expect("template pages/register");
    hb.register_template_file("pages/buy", "templates/pages/buy.hbs")
        .expect("template pages/buy");
    hb.register_template_file("pages/sell", "templates/pages/sell.hbs")
        .expect("template pages/sell");
    hb.register_template_file("pages/quote", "templates/pages/quote.hbs")
        .expect("template pages/quote");
    hb.register_template_file("pages/quoted", "templates/pages/quoted.hbs")
        .expect("template pages/quoted");
    hb.register_template_file("pages/deposit", "templates/pages/deposit.hbs")
        .expect("template pages/deposit");
    hb.register_template_file("pages/history", "templates/pages/history.hbs")
        .expect("template pages/history");
    hb.register_template_file("pages/apology", "templates/pages/apology.hbs")
        .expect("template pages/apology");
    hb.register_template_file("pages/not_found", "templates/pages/not_found.hbs")
        .expect("template pages/not_found");

    let navbar = std::fs::read_to_string("templates/partials/navbar.hbs")
        .expect("partials/navbar.hbs");
    hb.register_partial("navbar", navbar).expect("register navbar partial");

    let footer = std::fs::read_to_string("templates/partials/footer.hbs")
        .expect("partials/footer.hbs");
    hb.register_partial("footer", footer).expect("register footer partial");

    Arc::new(hb)
}
