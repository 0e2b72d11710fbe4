// Static gallery generation: one `<li>` card per movie, built with `maud`,
// substituted into an HTML template at a single placeholder token.

use std::fs;
use std::path::Path;

use log::info;
use maud::html;

use crate::error::{CatalogError, Result};
use crate::movie::Catalog;

pub const GRID_PLACEHOLDER: &str = "__TEMPLATE_MOVIE_GRID__";

/// Renders the cards for every movie, in catalog order. Titles and poster
/// references are escaped by `maud`.
pub fn render_grid(catalog: &Catalog) -> String {
    html! {
        @for (title, movie) in catalog.iter() {
            li {
                div.movie {
                    img.movie-poster src=(movie.poster.as_deref().unwrap_or_default()) alt="Movie Poster";
                    div.movie-title { (title) }
                    div.movie-year { (movie.year) }
                }
            }
        }
    }
    .into_string()
}

/// Substitutes the rendered grid into `template`.
pub fn render_page(template: &str, catalog: &Catalog) -> Result<String> {
    if !template.contains(GRID_PLACEHOLDER) {
        return Err(CatalogError::template(format!(
            "template has no {GRID_PLACEHOLDER} placeholder"
        )));
    }
    Ok(template.replace(GRID_PLACEHOLDER, &render_grid(catalog)))
}

/// Reads the template, renders the catalog into it and writes `output`.
pub fn generate(catalog: &Catalog, template_path: &Path, output_path: &Path) -> Result<()> {
    let template = fs::read_to_string(template_path).map_err(|e| {
        CatalogError::template(format!("cannot read {}: {e}", template_path.display()))
    })?;
    let page = render_page(&template, catalog)?;
    if let Some(dir) = output_path.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir)?;
    }
    fs::write(output_path, page)?;
    info!("Wrote {} movies to {}", catalog.len(), output_path.display());
    Ok(())
}
