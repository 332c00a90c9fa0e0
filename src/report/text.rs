use crate::config::Language;
use crate::recommend::Recommendation;

/// Plain-text result panel
pub struct TextFormatter;

struct Labels {
    crop: &'static str,
    location: &'static str,
    date: &'static str,
    weather: &'static str,
    temperature: &'static str,
    humidity: &'static str,
    rainfall: &'static str,
    sunlight: &'static str,
    hours: &'static str,
    growth_stage: &'static str,
    scores: &'static str,
    irrigation_level: &'static str,
    irrigation_advice: &'static str,
    fertilization_level: &'static str,
    fertilization_advice: &'static str,
}

const ZH_TW: Labels = Labels {
    crop: "作物",
    location: "地區",
    date: "日期",
    weather: "模擬天氣資料",
    temperature: "氣溫",
    humidity: "濕度",
    rainfall: "降雨量",
    sunlight: "日照時數",
    hours: "小時",
    growth_stage: "生長階段",
    scores: "AI 推論結果",
    irrigation_level: "灌溉等級",
    irrigation_advice: "灌溉建議",
    fertilization_level: "施肥等級",
    fertilization_advice: "施肥建議",
};

const EN: Labels = Labels {
    crop: "Crop",
    location: "Location",
    date: "Date",
    weather: "Simulated weather",
    temperature: "Temperature",
    humidity: "Humidity",
    rainfall: "Rainfall",
    sunlight: "Sunlight",
    hours: "h",
    growth_stage: "Growth stage",
    scores: "Model output",
    irrigation_level: "Irrigation level",
    irrigation_advice: "Irrigation advice",
    fertilization_level: "Fertilization level",
    fertilization_advice: "Fertilization advice",
};

impl TextFormatter {
    /// Format a recommendation in the given language
    pub fn format(rec: &Recommendation, language: Language) -> String {
        let l = match language {
            Language::ZhTw => &ZH_TW,
            Language::En => &EN,
        };
        let sep = match language {
            Language::ZhTw => "：",
            Language::En => ": ",
        };
        let ctx = &rec.context;
        let sc = &rec.model_scores;

        let mut out = String::with_capacity(512);
        out.push_str(&format!("{}{}{}\n", l.crop, sep, rec.input.crop));
        out.push_str(&format!("{}{}{}\n", l.location, sep, rec.input.location));
        out.push_str(&format!("{}{}{}\n\n", l.date, sep, rec.input.date));

        out.push_str(&format!("{}{}\n", l.weather, sep.trim_end()));
        out.push_str(&format!("  {}{}{} °C\n", l.temperature, sep, ctx.weather.temperature));
        out.push_str(&format!("  {}{}{} %\n", l.humidity, sep, ctx.weather.humidity));
        out.push_str(&format!("  {}{}{} mm\n", l.rainfall, sep, ctx.weather.rainfall));
        out.push_str(&format!("  {}{}{} {}\n", l.sunlight, sep, ctx.weather.sunlight, l.hours));
        out.push_str(&format!("  {}{}{:.2}\n\n", l.growth_stage, sep, ctx.growth_stage));

        out.push_str(&format!("{}{}\n", l.scores, sep.trim_end()));
        out.push_str(&format!(
            "  {}{}{} ({:.3})\n",
            l.irrigation_level,
            sep,
            sc.irrigation_level.display(language),
            sc.irrigation_score
        ));
        out.push_str(&format!("  {}{}{}\n\n", l.irrigation_advice, sep, sc.irrigation_advice));
        out.push_str(&format!(
            "  {}{}{} ({:.3})\n",
            l.fertilization_level,
            sep,
            sc.fertilization_level.display(language),
            sc.fertilization_score
        ));
        out.push_str(&format!("  {}{}{}\n", l.fertilization_advice, sep, sc.fertilization_advice));
        out
    }
}
