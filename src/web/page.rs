//! HTML page assembly for the dashboard.
//!
//! The page is a single document: narrative, summary table, the static SVG
//! charts, then the two dropdowns and the dynamic chart. Chart SVG comes from
//! our own renderer and is inlined as-is; everything that originates in the
//! dataset (group names, category labels) is escaped.

use crate::domain::{GroupColumn, Selection, XAxisColumn};
use crate::report::SummaryTable;
use crate::web::Dashboard;

pub const PAGE_TITLE: &str = "The 2019 GSS: Gender Wage Gap";

const NARRATIVE_HTML: &str = r#"<h3>The Gender Wage Gap</h3>
<p>The Center for American Progress
(<a href="https://www.americanprogress.org/issues/women/reports/2020/03/24/482141/quick-facts-gender-wage-gap/">quick facts on the gender wage gap</a>)
describes what the gender wage gap is, what drives it, and how it affects women and their families.
It defines the gap as "the difference in earnings between women and men".</p>
<p>Factors that keep the gap in place include:</p>
<ul>
<li>differences in industries or jobs worked</li>
<li>differences in years of experience</li>
<li>differences in hours worked</li>
<li>discrimination</li>
</ul>
<p>The article concludes that the gap has to be addressed through policy reform and shifts in cultural attitudes.</p>
<h3>The General Social Survey</h3>
<p>The GSS "is a nationally representative survey of adults in the United States conducted since 1972".
Its goal is to "monitor and explain trends in opinions, attitudes and behaviors", and it asks respondents
for demographic information as well as about certain behaviors and attitudes. According to the
<a href="http://www.gss.norc.org/About-The-GSS">official website</a>, the GSS "is the single best source
for sociological and attitudinal trend data covering the United States".</p>"#;

const STYLE: &str = "body{font-family:sans-serif;margin:24px;max-width:1000px}\
table{border-collapse:collapse}th,td{border:1px solid #ccc;padding:4px 10px;text-align:right}\
th:first-child,td:first-child{text-align:left}th{background:#eef}\
footer{clear:both;margin-top:24px;color:#777;font-size:12px}";

// Swaps the dynamic chart in place; the form still works as a plain GET.
const SCRIPT: &str = r#"<script>
(function () {
  var form = document.getElementById("controls");
  var graph = document.getElementById("graph");
  function refresh() {
    var q = new URLSearchParams(new FormData(form)).toString();
    fetch("/api/interactive-bar?" + q)
      .then(function (r) { if (!r.ok) { throw new Error(r.status); } return r.text(); })
      .then(function (svg) { graph.innerHTML = svg; history.replaceState(null, "", "/?" + q); })
      .catch(function () { form.submit(); });
  }
  form.addEventListener("change", refresh);
})();
</script>"#;

pub fn render_page(dashboard: &Dashboard, selection: Selection, interactive_svg: &str) -> String {
    let charts = &dashboard.charts;
    let mut html = String::with_capacity(256 * 1024);

    html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n");
    html.push_str(&format!("<title>{}</title>\n<style>{STYLE}</style>\n</head>\n<body>\n", escape_html(PAGE_TITLE)));
    html.push_str(&format!("<h1>{}</h1>\n", escape_html(PAGE_TITLE)));
    html.push_str(NARRATIVE_HTML);
    html.push('\n');

    html.push_str("<h2>Table Comparing Variables by Gender</h2>\n");
    html.push_str(&summary_table_html(&dashboard.report.summary));

    html.push_str("<h2>Barplot Comparing Views about Male Breadwinners</h2>\n");
    push_figure(&mut html, &charts.breadwinner_bar, None);

    html.push_str("<h2>Scatterplot Comparing Job Prestige &amp; Income by Gender</h2>\n");
    push_figure(&mut html, &charts.prestige_income_scatter, None);

    html.push_str("<div style=\"width:48%;float:left\">\n<h2>Boxplot Showing Income by Gender</h2>\n");
    push_figure(&mut html, &charts.income_box, None);
    html.push_str("</div>\n<div style=\"width:48%;float:right\">\n<h2>Boxplot Showing Job Prestige by Gender</h2>\n");
    push_figure(&mut html, &charts.prestige_box, None);
    html.push_str("</div>\n");

    html.push_str("<h2 style=\"clear:both\">Boxplot Showing Income &amp; Gender by Level of Job Prestige</h2>\n");
    push_figure(&mut html, &charts.income_by_prestige_grid, None);

    html.push_str("<h2>Interactive Barplot</h2>\n");
    html.push_str("<form id=\"controls\" method=\"get\" action=\"/\" style=\"width:25%;float:left\">\n");
    html.push_str("<h3>x-axis feature</h3>\n");
    html.push_str(&select_html(
        "x",
        "x-axis",
        XAxisColumn::ALL.iter().map(|x| x.as_str()),
        selection.x.as_str(),
    ));
    html.push_str("<h3>color</h3>\n");
    html.push_str(&select_html(
        "color",
        "color",
        GroupColumn::ALL.iter().map(|g| g.as_str()),
        selection.color.as_str(),
    ));
    html.push_str("<noscript><p><button type=\"submit\">Update</button></p></noscript>\n</form>\n");
    push_figure(&mut html, interactive_svg, Some("id=\"graph\" style=\"width:70%;display:inline-block\""));

    html.push_str(&format!(
        "<footer>Source: {} | {} respondents, {} complete for the interactive chart | generated {}</footer>\n",
        escape_html(&dashboard.source),
        dashboard.stats.rows_read,
        dashboard.interactive.len(),
        dashboard.generated_at.format("%Y-%m-%d %H:%M:%S"),
    ));
    html.push_str(SCRIPT);
    html.push_str("\n</body>\n</html>\n");
    html
}

fn push_figure(html: &mut String, svg: &str, attrs: Option<&str>) {
    match attrs {
        Some(a) => html.push_str(&format!("<div {a}>\n")),
        None => html.push_str("<div class=\"figure\">\n"),
    }
    html.push_str(svg);
    html.push_str("\n</div>\n");
}

/// The grouped-mean table as an HTML `<table>`.
pub fn summary_table_html(table: &SummaryTable) -> String {
    let mut out = String::from("<table>\n<thead><tr>");
    for h in table.headers() {
        out.push_str(&format!("<th>{}</th>", escape_html(h)));
    }
    out.push_str("</tr></thead>\n<tbody>\n");
    for row in &table.rows {
        out.push_str(&format!("<tr><td>{}</td>", escape_html(&row.group)));
        for mean in &row.means {
            match mean {
                Some(v) => out.push_str(&format!("<td>{v:.2}</td>")),
                None => out.push_str("<td></td>"),
            }
        }
        out.push_str("</tr>\n");
    }
    out.push_str("</tbody>\n</table>\n");
    out
}

fn select_html<'a>(name: &str, id: &str, options: impl Iterator<Item = &'a str>, selected: &str) -> String {
    let mut out = format!("<select name=\"{name}\" id=\"{id}\">\n");
    for value in options {
        let mark = if value == selected { " selected" } else { "" };
        out.push_str(&format!("<option value=\"{value}\"{mark}>{value}</option>\n"));
    }
    out.push_str("</select>\n");
    out
}

pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}
