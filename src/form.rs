// ============================================================================
// Formulaires de saisie
// ============================================================================
// Un formulaire = une liste de champs texte, dont un seul a le focus.
// Sert à la recherche, la connexion, l'inscription, la publication,
// la quantité d'achat et le montant de recharge.
//
// CONCEPT : Modal input (Vim-like)
// - Tab / ↓ passent au champ suivant, Shift+Tab / ↑ au précédent
// - Enter valide, ESC annule (géré par le handler)
// ============================================================================

/// Un champ de formulaire
#[derive(Debug, Clone, PartialEq)]
pub struct FormField {
    pub label: &'static str,
    pub value: String,
    /// Valeur masquée à l'affichage (mot de passe)
    pub secret: bool,
}

impl FormField {
    pub fn new(label: &'static str) -> Self {
        Self {
            label,
            value: String::new(),
            secret: false,
        }
    }

    pub fn secret(label: &'static str) -> Self {
        Self {
            secret: true,
            ..Self::new(label)
        }
    }

    /// Valeur telle qu'affichée (astérisques pour un secret)
    pub fn display_value(&self) -> String {
        if self.secret {
            "*".repeat(self.value.chars().count())
        } else {
            self.value.clone()
        }
    }
}

/// Formulaire affiché en popup
#[derive(Debug, Clone, PartialEq)]
pub struct Form {
    pub title: String,
    pub fields: Vec<FormField>,
    pub focused: usize,
}

impl Form {
    pub fn new(title: impl Into<String>, fields: Vec<FormField>) -> Self {
        Self {
            title: title.into(),
            fields,
            focused: 0,
        }
    }

    /// Formulaire d'un seul champ (recherche, quantité, montant)
    pub fn single(title: impl Into<String>, label: &'static str) -> Self {
        Self::new(title, vec![FormField::new(label)])
    }

    /// Pré-remplit le champ courant
    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        if let Some(field) = self.fields.get_mut(self.focused) {
            field.value = value.into();
        }
        self
    }

    pub fn next_field(&mut self) {
        if !self.fields.is_empty() {
            self.focused = (self.focused + 1) % self.fields.len();
        }
    }

    pub fn previous_field(&mut self) {
        if !self.fields.is_empty() {
            self.focused = (self.focused + self.fields.len() - 1) % self.fields.len();
        }
    }

    pub fn push_char(&mut self, c: char) {
        if let Some(field) = self.fields.get_mut(self.focused) {
            field.value.push(c);
        }
    }

    pub fn backspace(&mut self) {
        if let Some(field) = self.fields.get_mut(self.focused) {
            field.value.pop();
        }
    }

    /// Valeur brute du champ `index` (chaîne vide si absent)
    pub fn value(&self, index: usize) -> &str {
        self.fields.get(index).map(|f| f.value.as_str()).unwrap_or("")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn login_form() -> Form {
        Form::new(
            "Connexion",
            vec![FormField::new("Utilisateur"), FormField::secret("Mot de passe")],
        )
    }

    #[test]
    fn test_typing_goes_to_focused_field() {
        let mut form = login_form();
        form.push_char('a');
        form.push_char('l');
        form.next_field();
        form.push_char('x');
        form.push_char('y');
        form.backspace();

        assert_eq!(form.value(0), "al");
        assert_eq!(form.value(1), "x");
        assert_eq!(form.fields[1].display_value(), "*");
    }

    #[test]
    fn test_focus_wraps_around() {
        let mut form = login_form();
        form.previous_field();
        assert_eq!(form.focused, 1);
        form.next_field();
        assert_eq!(form.focused, 0);
    }

    #[test]
    fn test_missing_field_reads_empty() {
        let form = Form::single("Recherche", "Mot-clé").with_value("vélo");
        assert_eq!(form.value(0), "vélo");
        assert_eq!(form.value(3), "");
    }
}
