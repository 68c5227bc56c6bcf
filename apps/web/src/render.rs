//! # HTML Pages
//!
//! maud templates for every page the shop sees. Handlers build a view
//! struct and hand it to one of the `*_page` functions.
//!
//! ```text
//! layout(title, user, body)
//!   ├── login_page      GET/POST /login
//!   ├── register_page   GET/POST /registrar  (RegisterView)
//!   ├── history_page    GET /historico       (HistoryView)
//!   └── error_page      any WebError
//! ```
//!
//! ## Example
//! ```rust
//! use barber_web::render::login_page;
//!
//! let page = login_page(Some("Usuário ou senha inválidos")).into_string();
//! assert!(page.starts_with("<!DOCTYPE html>"));
//! assert!(page.contains(r#"action="/login""#));
//! assert!(page.contains("Usuário ou senha inválidos"));
//! ```

use axum::http::StatusCode;
use barber_core::{Sale, SalesTotals, User};
use maud::{html, Markup, DOCTYPE};

use crate::routes::SaleForm;

const STYLE: &str = "
body { font-family: system-ui, sans-serif; margin: 0; background: #f4f1ec; color: #222; }
header { background: #222; color: #f4f1ec; padding: .75rem 1rem; display: flex; gap: 1rem; align-items: center; }
header a { color: #f4f1ec; }
header .who { margin-left: auto; }
main { max-width: 960px; margin: 1.5rem auto; padding: 0 1rem; }
form.stack label { display: block; margin: .5rem 0 .15rem; }
form.stack input, form.stack select { width: 100%; max-width: 320px; padding: .35rem; }
button { margin-top: .75rem; padding: .4rem 1rem; }
.erro { color: #a40000; font-weight: bold; }
.totais { display: flex; gap: 2rem; font-size: 1.1rem; margin: 1rem 0; }
table { border-collapse: collapse; width: 100%; background: #fff; }
th, td { border: 1px solid #ccc; padding: .3rem .5rem; text-align: left; }
td.num { text-align: right; }
form.inline { display: inline; }
";

/// Data for the history page.
#[derive(Debug)]
pub struct HistoryView<'a> {
    pub user: &'a User,
    pub sales: &'a [Sale],
    pub totals: SalesTotals,
    /// ISO `inicio` echoed into the filter form.
    pub start: String,
    /// ISO `fim` echoed into the filter form.
    pub end: String,
    /// Admin barber filter, empty for everyone.
    pub barber: String,
    pub barbers: Vec<&'a User>,
}

/// Data for the register form.
#[derive(Debug)]
pub struct RegisterView<'a> {
    pub user: &'a User,
    pub products: &'a [String],
    pub barbers: Vec<&'a User>,
    pub error: Option<String>,
    pub values: &'a SaleForm,
}

fn layout(title: &str, user: Option<&User>, body: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="pt-BR" {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1";
                title { (title) " - Barbearia" }
                style { (maud::PreEscaped(STYLE)) }
            }
            body {
                @if let Some(user) = user {
                    header {
                        strong { "Barbearia" }
                        a href="/registrar" { "Registrar venda" }
                        a href="/historico" { "Histórico" }
                        span.who { (user.display_name) " (" (user.role) ") " a href="/logout" { "Sair" } }
                    }
                }
                main { (body) }
            }
        }
    }
}

pub fn login_page(error: Option<&str>) -> Markup {
    layout(
        "Entrar",
        None,
        html! {
            h1 { "Barbearia" }
            @if let Some(error) = error {
                p.erro { (error) }
            }
            form.stack method="post" action="/login" {
                label for="usuario" { "Usuário" }
                input #usuario name="usuario" type="text" autocomplete="username" required;
                label for="senha" { "Senha" }
                input #senha name="senha" type="password" autocomplete="current-password" required;
                button type="submit" { "Entrar" }
            }
        },
    )
}

pub fn register_page(view: &RegisterView<'_>) -> Markup {
    let values = view.values;
    let selected_barber = values
        .barbeiro
        .as_deref()
        .unwrap_or(view.user.username.as_str());

    layout(
        "Registrar venda",
        Some(view.user),
        html! {
            h1 { "Registrar venda" }
            @if let Some(error) = &view.error {
                p.erro { (error) }
            }
            form.stack method="post" action="/registrar" {
                label for="cliente" { "Cliente" }
                input #cliente name="cliente" type="text" value=(values.cliente);

                @if view.user.role.is_admin() {
                    label for="barbeiro" { "Barbeiro" }
                    select #barbeiro name="barbeiro" {
                        @for barber in &view.barbers {
                            option value=(barber.username) selected[barber.username == selected_barber] {
                                (barber.display_name)
                            }
                        }
                    }
                }

                label for="cabelo" { "Cabelo (R$)" }
                input #cabelo name="cabelo" type="text" inputmode="decimal" value=(values.cabelo);
                label for="barba" { "Barba (R$)" }
                input #barba name="barba" type="text" inputmode="decimal" value=(values.barba);
                label for="sobrancelha" { "Sobrancelha (R$)" }
                input #sobrancelha name="sobrancelha" type="text" inputmode="decimal" value=(values.sobrancelha);

                label for="produto_nome" { "Produto" }
                select #produto_nome name="produto_nome" {
                    option value="" { "Nenhum" }
                    @for product in view.products {
                        option value=(product) selected[*product == values.produto_nome] { (product) }
                    }
                }
                label for="produto_valor" { "Valor do produto (R$)" }
                input #produto_valor name="produto_valor" type="text" inputmode="decimal" value=(values.produto_valor);

                label for="desconto" { "Desconto (R$)" }
                input #desconto name="desconto" type="text" inputmode="decimal" value=(values.desconto);

                button type="submit" { "Salvar" }
            }
        },
    )
}

pub fn history_page(view: &HistoryView<'_>) -> Markup {
    let is_admin = view.user.role.is_admin();
    let download = if is_admin && !view.barber.is_empty() {
        format!(
            "/download?inicio={}&fim={}&barbeiro={}",
            view.start, view.end, view.barber
        )
    } else {
        format!("/download?inicio={}&fim={}", view.start, view.end)
    };

    layout(
        "Histórico",
        Some(view.user),
        html! {
            h1 { "Histórico de vendas" }

            div.totais {
                span { "Hoje: R$ " strong { (view.totals.today) } }
                span { "Mês: R$ " strong { (view.totals.month) } }
            }

            form method="get" action="/historico" {
                label { "Início " input name="inicio" type="date" value=(view.start); }
                " "
                label { "Fim " input name="fim" type="date" value=(view.end); }
                @if is_admin {
                    " "
                    label {
                        "Barbeiro "
                        select name="barbeiro" {
                            option value="" { "Todos" }
                            @for barber in &view.barbers {
                                option value=(barber.username) selected[barber.username == view.barber] {
                                    (barber.display_name)
                                }
                            }
                        }
                    }
                }
                " "
                button type="submit" { "Filtrar" }
                " "
                a href=(download) { "Baixar CSV" }
            }

            @if view.sales.is_empty() {
                p { "Nenhuma venda no período." }
            } @else {
                table {
                    thead {
                        tr {
                            th { "Data" } th { "Hora" } th { "Cliente" } th { "Barbeiro" }
                            th { "Cabelo" } th { "Barba" } th { "Sobrancelha" }
                            th { "Produto" } th { "Valor Produto" } th { "Desconto" } th { "Total" }
                            @if is_admin { th {} }
                        }
                    }
                    tbody {
                        @for sale in view.sales {
                            tr {
                                td { (sale.sale_date.format("%d/%m/%Y")) }
                                td { (sale.sale_time) }
                                td { (sale.client) }
                                td { (sale.barber) }
                                td.num { (sale.haircut) }
                                td.num { (sale.beard) }
                                td.num { (sale.eyebrow) }
                                td { (sale.product_name.as_deref().unwrap_or("")) }
                                td.num { (sale.product_price) }
                                td.num { (sale.discount) }
                                td.num { strong { (sale.total) } }
                                @if is_admin {
                                    td {
                                        form.inline method="post" action={ "/vendas/" (sale.id) "/excluir" } {
                                            button type="submit" { "Excluir" }
                                        }
                                    }
                                }
                            }
                        }
                    }
                }
            }
        },
    )
}

pub fn error_page(status: StatusCode, message: &str) -> Markup {
    layout(
        status.canonical_reason().unwrap_or("Erro"),
        None,
        html! {
            h1 { (status.as_u16()) }
            p.erro { (message) }
            p { a href="/historico" { "Voltar" } }
        },
    )
}
