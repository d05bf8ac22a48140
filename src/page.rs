//! The single HTML page: input form plus optional prediction text.

/// Wisconsin diagnostic features, in the column order the model was trained on.
pub const FEATURE_NAMES: [&str; 30] = [
    "radius_mean",
    "texture_mean",
    "perimeter_mean",
    "area_mean",
    "smoothness_mean",
    "compactness_mean",
    "concavity_mean",
    "concave_points_mean",
    "symmetry_mean",
    "fractal_dimension_mean",
    "radius_se",
    "texture_se",
    "perimeter_se",
    "area_se",
    "smoothness_se",
    "compactness_se",
    "concavity_se",
    "concave_points_se",
    "symmetry_se",
    "fractal_dimension_se",
    "radius_worst",
    "texture_worst",
    "perimeter_worst",
    "area_worst",
    "smoothness_worst",
    "compactness_worst",
    "concavity_worst",
    "concave_points_worst",
    "symmetry_worst",
    "fractal_dimension_worst",
];

pub fn render_index(prediction_text: Option<&str>) -> String {
    let mut fields = String::new();
    for name in FEATURE_NAMES {
        let label = name.replace('_', " ");
        fields.push_str(&format!(
            "      <label>{label}<input type=\"text\" name=\"{name}\" required></label>\n"
        ));
    }

    let result = match prediction_text {
        Some(text) => format!(
            "    <div class=\"prediction\">{}</div>\n",
            escape_html(text)
        ),
        None => String::new(),
    };

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <title>Breast Cancer Prediction</title>
</head>
<body>
  <main>
    <h1>Breast Cancer Prediction</h1>
    <form action="/predict" method="post">
{fields}      <button type="submit">Predict</button>
    </form>
{result}  </main>
</body>
</html>
"#
    )
}

fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
