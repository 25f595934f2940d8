use crate::conversation::render::Responder;
use crate::conversation::texts;
use crate::models::terminal::Statistics;
use crate::state::AppState;
use tracing::warn;

pub fn format_statistics(stats: &Statistics) -> String {
    [
        ("Общее количество контейнеров", stats.total_containers),
        ("Груженые контейнеры", stats.loaded_containers),
        ("Порожние контейнеры", stats.empty_containers),
        ("Контейнеры на терминале", stats.total_active_containers),
        ("Отправленные контейнеры", stats.total_dispatched_containers),
        ("Новые контейнеры", stats.new_arrived_containers),
    ]
    .iter()
    .map(|(label, value)| format!("{}: <b>{}</b>", label, value))
    .collect::<Vec<_>>()
    .join("\n")
}

pub async fn show(app: &AppState, responder: &mut Responder<'_>) -> anyhow::Result<()> {
    match app.terminal.fetch_statistics().await {
        Ok(stats) => responder.say(&format_statistics(&stats), None).await,
        Err(err) => {
            warn!("statistics unavailable: {}", err);
            responder.say(texts::STATISTICS_FAILED, None).await
        }
    }
}
