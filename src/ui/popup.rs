// ============================================================================
// Popups : formulaires, confirmations, messages
// ============================================================================
// CONCEPT RATATUI : Clear
// - Efface la zone avant de dessiner par-dessus l'écran courant
// - La popup est centrée avec centered_rect()
// ============================================================================

use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use crate::app::Confirmation;
use crate::form::Form;
use crate::worker::{Notice, NoticeKind};

/// Rectangle centré de `width` colonnes et `height` lignes (borné à `area`)
pub fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);

    Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    )
}

/// Message bloquant : n'importe quelle touche le ferme
pub fn render_notice(frame: &mut Frame, notice: &Notice) {
    let (title, color) = match notice.kind {
        NoticeKind::Info => (" Information ", Color::Green),
        NoticeKind::Error => (" Erreur ", Color::Red),
    };

    let text = vec![
        Line::from(""),
        Line::from(Span::styled(
            notice.message.clone(),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled(
            "Appuyez sur une touche pour continuer",
            Style::default().fg(Color::Gray),
        )),
    ];

    draw_popup(frame, title, color, text, 7);
}

/// Question oui/non avant une action irréversible
pub fn render_confirmation(frame: &mut Frame, confirmation: &Confirmation) {
    let text = vec![
        Line::from(""),
        Line::from(Span::styled(
            confirmation.prompt.clone(),
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled("[y / Enter]", Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)),
            Span::raw(" Confirmer  "),
            Span::styled("[autre touche]", Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)),
            Span::raw(" Annuler"),
        ]),
    ];

    draw_popup(frame, " Confirmation ", Color::Yellow, text, 7);
}

/// Formulaire : un champ par ligne, curseur sur le champ actif
pub fn render_form(frame: &mut Frame, form: &Form) {
    let mut text: Vec<Line> = vec![Line::from("")];

    for (index, field) in form.fields.iter().enumerate() {
        let focused = index == form.focused;
        let label_style = if focused {
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Gray)
        };

        let mut spans = vec![
            Span::styled(format!("{:>12} : ", field.label), label_style),
            Span::styled(field.display_value(), Style::default().fg(Color::White)),
        ];
        if focused {
            spans.push(Span::styled(
                "█",
                Style::default().fg(Color::White).add_modifier(Modifier::SLOW_BLINK),
            ));
        }
        text.push(Line::from(spans));
    }

    text.push(Line::from(""));
    text.push(Line::from(vec![
        Span::styled("[Enter]", Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)),
        Span::raw(" Valider  "),
        Span::styled("[Tab]", Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)),
        Span::raw(" Champ suivant  "),
        Span::styled("[ESC]", Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)),
        Span::raw(" Annuler"),
    ]));

    let height = u16::try_from(text.len()).unwrap_or(u16::MAX).saturating_add(2);
    let title = format!(" {} ", form.title);
    draw_popup(frame, &title, Color::Green, text, height);
}

fn draw_popup(frame: &mut Frame, title: &str, color: Color, text: Vec<Line>, height: u16) {
    let area = centered_rect(64, height, frame.size());

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(color))
        .title(title.to_string())
        .title_alignment(Alignment::Center);

    let paragraph = Paragraph::new(text)
        .block(block)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });

    frame.render_widget(Clear, area);
    frame.render_widget(paragraph, area);
}
